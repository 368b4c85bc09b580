//! T-SQL rendering of a copy plan
//!
//! Layout is part of the output contract: four-space indentation, one
//! statement per block, a blank line before every statement, bracket-quoted
//! identifiers, and join aliases numbered as recorded in the plan.

use crate::options::ResolvedOptions;
use crate::plan::{mapping_variable, CopyPlan, TablePlan};
use dd_core::sql_utils::quote_qualified;
use dd_core::{Catalog, ColumnId, ForeignKeyId, Table};
use std::collections::HashMap;

const INDENT: &str = "    ";

/// Render the declarations, copy statements, and deferred updates.
///
/// The result starts with a newline and every statement is followed by one,
/// so consecutive statements are separated by a blank line.
pub(crate) fn render_body(catalog: &Catalog, plan: &CopyPlan, options: &ResolvedOptions) -> String {
    let mut statements = Vec::new();

    for step in plan.mapped_tables() {
        statements.push(render_mapping_declaration(catalog.table(step.table)));
    }
    for step in &plan.tables {
        statements.push(render_copy(catalog, plan, step, options));
    }
    for step in plan.deferred_tables() {
        statements.push(render_deferred_update(catalog, step));
    }

    statements
        .iter()
        .map(|statement| format!("\n{statement}\n"))
        .collect()
}

/// Render the complete `CREATE PROCEDURE` statement.
pub(crate) fn render_procedure(
    catalog: &Catalog,
    plan: &CopyPlan,
    options: &ResolvedOptions,
) -> String {
    let mut parameters = vec![format!("{INDENT}{} INT", options.input_parameter)];
    if let Some(output) = &options.output_parameter {
        parameters.push(format!("{INDENT}{output} INT = NULL OUTPUT"));
    }

    format!(
        "CREATE PROCEDURE {name}\n\
         {parameters}\n\
         AS\n\
         BEGIN\n\
         {INDENT}SET NOCOUNT ON;\n\
         {INDENT}SET XACT_ABORT ON;\n\
         {INDENT}BEGIN TRAN;\n\
         {body}\n\
         {INDENT}COMMIT TRAN;\n\
         END;",
        name = quote_qualified(&options.schema, &options.procedure_name),
        parameters = parameters.join(",\n"),
        body = render_body(catalog, plan, options),
    )
}

fn render_mapping_declaration(table: &Table) -> String {
    format!(
        "{INDENT}DECLARE {} TABLE (\n\
         {INDENT}{INDENT}ExistingID INT NOT NULL UNIQUE,\n\
         {INDENT}{INDENT}InsertedID INT NOT NULL UNIQUE\n\
         {INDENT});",
        mapping_variable(table)
    )
}

/// Join a list of lines, appending `separator` to all but the last and
/// `terminator` to the last.
fn list_lines(items: Vec<String>, separator: &str, terminator: &str) -> Vec<String> {
    let last = items.len().saturating_sub(1);
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if i == last {
                format!("{item}{terminator}")
            } else {
                format!("{item}{separator}")
            }
        })
        .collect()
}

/// Render the `MERGE` copying one table's in-scope rows.
fn render_copy(
    catalog: &Catalog,
    plan: &CopyPlan,
    step: &TablePlan,
    options: &ResolvedOptions,
) -> String {
    let table = catalog.table(step.table);
    let target = quote_qualified(table.schema(), table.name());
    let primary_key = table.primary_key().name().quoted();
    let joins: Vec<(usize, ForeignKeyId)> = step.insert_joins().collect();

    let mut lines = vec![
        format!("{INDENT}MERGE INTO {target} AS Target"),
        format!("{INDENT}USING ("),
    ];

    if step.parent.is_none() {
        lines.push(format!("{INDENT}{INDENT}SELECT *"));
        lines.push(format!("{INDENT}{INDENT}FROM {target}"));
        lines.push(format!(
            "{INDENT}{INDENT}WHERE {primary_key} = {}",
            options.input_parameter
        ));
    } else {
        lines.push(format!("{INDENT}{INDENT}SELECT"));
        let mut selected = vec![format!("{INDENT}{INDENT}{INDENT}copy.*")];
        selected.extend(
            joins
                .iter()
                .map(|(alias, _)| format!("{INDENT}{INDENT}{INDENT}j{alias}.InsertedID j{alias}InsertedID")),
        );
        lines.extend(list_lines(selected, ",", ""));
        lines.push(format!("{INDENT}{INDENT}FROM {target} copy"));
        for (alias, fk) in &joins {
            let fk = catalog.foreign_key(*fk);
            lines.push(format!(
                "{INDENT}{INDENT}JOIN {} j{alias}",
                mapping_variable(catalog.table(fk.target()))
            ));
            lines.push(format!(
                "{INDENT}{INDENT}{INDENT}ON copy.{} = j{alias}.ExistingID",
                catalog.foreign_key_column(fk).name().quoted()
            ));
        }
    }

    lines.push(format!("{INDENT}) AS Source"));
    lines.push(format!("{INDENT}ON 1 = 0"));
    lines.push(format!("{INDENT}WHEN NOT MATCHED BY TARGET THEN"));

    let joined_columns: HashMap<ColumnId, usize> = joins
        .iter()
        .map(|&(alias, fk)| (catalog.foreign_key(fk).column(), alias))
        .collect();
    let (names, values): (Vec<String>, Vec<String>) = table
        .insertable_columns()
        .map(|column| {
            let value = match options.override_for(column.id()) {
                Some(expression) => expression.to_string(),
                None => match joined_columns.get(&column.id()) {
                    Some(alias) => format!("j{alias}InsertedID"),
                    None => format!("Source.{}", column.name().quoted()),
                },
            };
            (
                format!("{INDENT}{INDENT}{}", column.name().quoted()),
                format!("{INDENT}{INDENT}{value}"),
            )
        })
        .unzip();

    if names.is_empty() {
        lines.push(format!("{INDENT}INSERT DEFAULT VALUES"));
    } else {
        lines.push(format!("{INDENT}INSERT ("));
        lines.extend(list_lines(names, ",", ")"));
        lines.push(format!("{INDENT}VALUES ("));
        lines.extend(list_lines(values, ",", ")"));
    }

    if step.requires_mapping {
        lines.push(format!(
            "{INDENT}OUTPUT Source.{primary_key}, Inserted.{primary_key}"
        ));
        lines.push(format!("{INDENT}INTO {};", mapping_variable(table)));
        if step.table == plan.root {
            if let Some(output) = &options.output_parameter {
                lines.push(format!("{INDENT}SET {output} = SCOPE_IDENTITY();"));
            }
        }
    } else if let Some(last) = lines.last_mut() {
        last.push(';');
    }

    lines.join("\n")
}

/// Render the update remapping a table's deferred references.
///
/// A single reference uses an inner join: rows without a match keep the
/// value copied by the insert. Several references share one statement with
/// left joins so a missing match for one column does not skip the others.
fn render_deferred_update(catalog: &Catalog, step: &TablePlan) -> String {
    let table = catalog.table(step.table);
    let combined = step.deferred.len() > 1;

    let mut assignments = Vec::with_capacity(step.deferred.len());
    let mut joins = Vec::with_capacity(step.deferred.len() * 2);
    for (alias, &fk) in step.deferred.iter().enumerate() {
        let fk = catalog.foreign_key(fk);
        let column = catalog.foreign_key_column(fk).name().quoted();
        assignments.push(if combined {
            format!("{INDENT}{INDENT}copy.{column} = COALESCE(j{alias}.InsertedID, copy.{column})")
        } else {
            format!("{INDENT}{INDENT}copy.{column} = j{alias}.InsertedID")
        });
        joins.push(format!(
            "{INDENT}{}JOIN {} j{alias}",
            if combined { "LEFT " } else { "" },
            mapping_variable(catalog.table(fk.target()))
        ));
        joins.push(format!(
            "{INDENT}{INDENT}ON copy.{column} = j{alias}.ExistingID"
        ));
    }

    let mut lines = vec![format!("{INDENT}UPDATE copy"), format!("{INDENT}SET")];
    lines.extend(list_lines(assignments, ",", ""));
    lines.push(format!(
        "{INDENT}FROM {} copy",
        quote_qualified(table.schema(), table.name())
    ));
    lines.extend(joins);
    lines.push(format!(
        "{INDENT}WHERE copy.{} IN (SELECT InsertedID FROM {});",
        table.primary_key().name().quoted(),
        mapping_variable(table)
    ));

    lines.join("\n")
}

#[cfg(test)]
#[path = "emitter_test.rs"]
mod tests;
