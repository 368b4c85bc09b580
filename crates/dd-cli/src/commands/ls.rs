//! List command implementation

use anyhow::Result;
use dd_core::{Catalog, ForeignKeyGraph};
use serde::Serialize;

use crate::cli::{GlobalArgs, LsArgs, OutputFormat};
use crate::commands::common::{load_project, print_json};

/// Execute the ls command
pub fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let listing = build_listing(&project.catalog);

    match args.output {
        OutputFormat::Table => print_table(&listing),
        OutputFormat::Json => print_json(&listing)?,
    }

    Ok(())
}

/// Catalog listing for display
#[derive(Debug, Serialize)]
struct Listing {
    tables: Vec<TableInfo>,
    /// Groups of tables whose foreign keys form a cycle
    cycles: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct TableInfo {
    name: String,
    primary_key: String,
    columns: usize,
    references: Vec<ReferenceInfo>,
    referenced_by: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ReferenceInfo {
    column: String,
    target: String,
    nullable: bool,
}

fn build_listing(catalog: &Catalog) -> Listing {
    let graph = ForeignKeyGraph::build(catalog);

    let tables = catalog
        .tables()
        .iter()
        .map(|table| TableInfo {
            name: table.qualified_name(),
            primary_key: table.primary_key().name().to_string(),
            columns: table.columns().len(),
            references: catalog
                .outgoing_foreign_keys(table.id())
                .map(|fk| ReferenceInfo {
                    column: catalog.foreign_key_column(fk).name().to_string(),
                    target: catalog.table(fk.target()).qualified_name(),
                    nullable: fk.is_nullable(),
                })
                .collect(),
            referenced_by: graph
                .referencing_tables(table.id())
                .into_iter()
                .map(|id| catalog.table(id).qualified_name())
                .collect(),
        })
        .collect();

    let cycles = graph
        .cycles()
        .into_iter()
        .map(|cycle| {
            cycle
                .into_iter()
                .map(|id| catalog.table(id).qualified_name())
                .collect()
        })
        .collect();

    Listing { tables, cycles }
}

/// Print tables in table format
fn print_table(listing: &Listing) {
    let name_width = listing
        .tables
        .iter()
        .map(|t| t.name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let key_width = listing
        .tables
        .iter()
        .map(|t| t.primary_key.len())
        .max()
        .unwrap_or(3)
        .max(3);

    println!(
        "{:<name_width$}  {:<key_width$}  {:<7}  REFERENCES",
        "NAME", "KEY", "COLUMNS"
    );
    println!(
        "{:-<name_width$}  {:-<key_width$}  {:-<7}  {}",
        "",
        "",
        "",
        "-".repeat(40)
    );

    for table in &listing.tables {
        let references = if table.references.is_empty() {
            "-".to_string()
        } else {
            table
                .references
                .iter()
                .map(|r| {
                    let null = if r.nullable { " (nullable)" } else { "" };
                    format!("{} -> {}{null}", r.column, r.target)
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "{:<name_width$}  {:<key_width$}  {:<7}  {}",
            table.name, table.primary_key, table.columns, references
        );
    }

    println!("\n{} tables", listing.tables.len());
    for cycle in &listing.cycles {
        println!("Cycle: {}", cycle.join(" <-> "));
    }
}

#[cfg(test)]
#[path = "ls_test.rs"]
mod tests;
