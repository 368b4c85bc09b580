//! Plan command implementation

use anyhow::{Context, Result};
use dd_generate::TableSummary;

use crate::cli::{GlobalArgs, OutputFormat, PlanArgs};
use crate::commands::common::{load_project, print_json};

/// Execute the plan command
pub fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;

    let plan = dd_generate::plan(&project.catalog, &args.root, args.output_param)
        .with_context(|| format!("Failed to plan copy rooted at '{}'", args.root))?;
    let summary = plan.describe(&project.catalog);

    match args.output {
        OutputFormat::Table => print_table(&summary),
        OutputFormat::Json => print_json(&summary)?,
    }

    Ok(())
}

/// Print copy steps in table format
fn print_table(steps: &[TableSummary]) {
    let table_width = steps
        .iter()
        .map(|s| s.table.len())
        .max()
        .unwrap_or(5)
        .max(5);
    let mapping_width = steps
        .iter()
        .map(|s| s.mapping.as_ref().map_or(1, String::len))
        .max()
        .unwrap_or(7)
        .max(7);

    println!(
        "{:<3}  {:<table_width$}  {:<mapping_width$}  REFERENCES",
        "#", "TABLE", "MAPPING"
    );
    println!(
        "{:-<3}  {:-<table_width$}  {:-<mapping_width$}  {}",
        "",
        "",
        "",
        "-".repeat(40)
    );

    for (position, step) in steps.iter().enumerate() {
        let references = if step.references.is_empty() {
            "-".to_string()
        } else {
            step.references
                .iter()
                .map(|r| match &r.alias {
                    Some(alias) => format!("{} -> {} ({}, {alias})", r.column, r.target, r.kind),
                    None => format!("{} -> {} ({})", r.column, r.target, r.kind),
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        println!(
            "{:<3}  {:<table_width$}  {:<mapping_width$}  {}",
            position + 1,
            step.table,
            step.mapping.as_deref().unwrap_or("-"),
            references
        );
    }

    println!("\n{} tables copied", steps.len());
}
