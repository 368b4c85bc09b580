//! Shared utilities for CLI commands

use anyhow::{bail, Context, Result};
use dd_core::{ColumnRef, ProcedureConfig, Project};
use dd_generate::ProcedureOptions;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Load the project named by the global arguments.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = Path::new(&global.project_dir);
    let project = match &global.config {
        Some(config) => Project::load_with_config(root, Path::new(config)),
        None => Project::load(root),
    }
    .context("Failed to load project")?;

    if global.verbose {
        eprintln!(
            "[verbose] Loaded project '{}' with {} tables",
            project.config.name,
            project.catalog.len()
        );
    }
    Ok(project)
}

/// Parse a `Table.Column=parameter` override argument.
pub(crate) fn parse_override(value: &str) -> Result<(ColumnRef, String)> {
    let Some((column, parameter)) = value.split_once('=') else {
        bail!("Override '{value}' must be of the form Table.Column=parameter");
    };
    let Some(column) = ColumnRef::parse(column.trim()) else {
        bail!("Override '{value}' must name a column as Table.Column");
    };
    let parameter = parameter.trim();
    if parameter.is_empty() {
        bail!("Override '{value}' is missing a parameter name");
    }
    Ok((column, parameter.to_string()))
}

/// Generation options for a procedure declared in deepdup.yml.
pub(crate) fn options_from_config(procedure: &ProcedureConfig) -> ProcedureOptions {
    ProcedureOptions {
        procedure_name: procedure.name.clone(),
        primary_key_parameter_name: procedure.primary_key_parameter.clone(),
        primary_key_output_parameter_name: procedure.primary_key_output_parameter.clone(),
        update_parameter_names: procedure.override_refs().into_iter().collect(),
    }
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
