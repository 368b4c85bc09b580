//! Procedure customization
//!
//! Callers may rename the procedure and its parameters and substitute the
//! inserted value of specific columns with a parameter. None of this changes
//! the copy structure: overrides only replace a column's `VALUES` expression.

use crate::error::{GenerateError, GenerateResult};
use crate::resolver::Containment;
use dd_core::sql_utils::{is_valid_parameter_name, normalize_parameter_name, split_qualified_name};
use dd_core::{Catalog, ColumnId, ColumnRef, Table};
use std::collections::{BTreeMap, HashMap};

/// Default name of the input parameter holding the root row's primary key
pub const DEFAULT_PRIMARY_KEY_PARAMETER: &str = "id";

/// Caller-supplied customization of a generated procedure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcedureOptions {
    /// Procedure name, optionally schema-qualified.
    /// Defaults to `Copy<RootSingularName>` in the root table's schema.
    pub procedure_name: Option<String>,

    /// Input parameter holding the root row's primary key (default `id`)
    pub primary_key_parameter_name: Option<String>,

    /// Output parameter receiving the copied root row's primary key
    pub primary_key_output_parameter_name: Option<String>,

    /// Column value overrides: column -> parameter name (`@` optional)
    pub update_parameter_names: BTreeMap<ColumnRef, String>,
}

impl ProcedureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_procedure_name(mut self, name: impl Into<String>) -> Self {
        self.procedure_name = Some(name.into());
        self
    }

    pub fn with_primary_key_parameter(mut self, name: impl Into<String>) -> Self {
        self.primary_key_parameter_name = Some(name.into());
        self
    }

    pub fn with_output_parameter(mut self, name: impl Into<String>) -> Self {
        self.primary_key_output_parameter_name = Some(name.into());
        self
    }

    /// Insert `parameter` instead of the source value of `table.column`.
    pub fn with_override(
        mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        parameter: impl Into<String>,
    ) -> Self {
        self.update_parameter_names
            .insert(ColumnRef::new(table, column), parameter.into());
        self
    }
}

/// Options checked against the catalog and normalized for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedOptions {
    /// Unquoted schema of the procedure
    pub schema: String,
    /// Unquoted procedure name
    pub procedure_name: String,
    /// Input parameter with sigil
    pub input_parameter: String,
    /// Output parameter with sigil
    pub output_parameter: Option<String>,
    /// Override expressions by column
    pub overrides: HashMap<ColumnId, String>,
}

impl ResolvedOptions {
    /// Override expression for a column, if any
    pub fn override_for(&self, column: ColumnId) -> Option<&str> {
        self.overrides.get(&column).map(String::as_str)
    }
}

fn parameter(context: &str, name: &str) -> GenerateResult<String> {
    if is_valid_parameter_name(name) {
        Ok(normalize_parameter_name(name))
    } else {
        Err(GenerateError::InvalidName {
            context: context.to_string(),
            name: name.to_string(),
        })
    }
}

/// Validate `options` for a copy rooted at `root` and normalize names.
pub(crate) fn resolve_options(
    catalog: &Catalog,
    root: &Table,
    containment: &Containment,
    options: &ProcedureOptions,
) -> GenerateResult<ResolvedOptions> {
    let (schema, procedure_name) = match options.procedure_name.as_deref() {
        Some(name) => {
            let (schema, name) = split_qualified_name(name);
            if name.is_empty() || schema.is_some_and(str::is_empty) {
                return Err(GenerateError::InvalidName {
                    context: "procedure name".into(),
                    name: options.procedure_name.clone().unwrap_or_default(),
                });
            }
            (
                schema.unwrap_or(root.schema().as_str()).to_string(),
                name.to_string(),
            )
        }
        None => (
            root.schema().to_string(),
            format!("Copy{}", root.singular_name()),
        ),
    };

    let input_parameter = parameter(
        "primary key parameter",
        options
            .primary_key_parameter_name
            .as_deref()
            .unwrap_or(DEFAULT_PRIMARY_KEY_PARAMETER),
    )?;
    let output_parameter = options
        .primary_key_output_parameter_name
        .as_deref()
        .map(|name| parameter("primary key output parameter", name))
        .transpose()?;
    if output_parameter.as_deref() == Some(input_parameter.as_str()) {
        return Err(GenerateError::InvalidName {
            context: "primary key output parameter (same as the input parameter)".into(),
            name: input_parameter,
        });
    }

    let mut overrides = HashMap::with_capacity(options.update_parameter_names.len());
    for (column_ref, value) in &options.update_parameter_names {
        let column = catalog
            .resolve_column(column_ref)
            .map_err(GenerateError::from_lookup)?;
        let conflict = |reason: &str| GenerateError::CustomizationConflict {
            table: column_ref.table.clone(),
            column: column_ref.column.clone(),
            reason: reason.to_string(),
        };

        if column.is_primary_key() {
            return Err(conflict("identity column values are generated by the database"));
        }
        if !containment.contains(column.id().table) {
            return Err(conflict(&format!(
                "table is not copied by a procedure rooted at {}",
                root.name()
            )));
        }
        let expression = parameter(&format!("override parameter for {column_ref}"), value)?;
        if overrides.insert(column.id(), expression).is_some() {
            return Err(conflict("column is overridden more than once"));
        }
    }

    Ok(ResolvedOptions {
        schema,
        procedure_name,
        input_parameter,
        output_parameter,
        overrides,
    })
}

#[cfg(test)]
#[path = "options_test.rs"]
mod tests;
