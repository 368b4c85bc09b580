//! Generate command implementation

use anyhow::{bail, Context, Result};
use dd_core::{Catalog, Project};
use dd_generate::options::DEFAULT_PRIMARY_KEY_PARAMETER;
use dd_generate::{generate_procedure, generate_procedure_body, ProcedureOptions};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cli::{GenerateArgs, GlobalArgs};
use crate::commands::common::{load_project, options_from_config, parse_override};

/// Execute the generate command
pub fn execute(args: &GenerateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;

    match &args.root {
        Some(root) => generate_one(&project, root, args, global),
        None => generate_configured(&project, args, global),
    }
}

/// Generate a single procedure described entirely on the command line.
fn generate_one(project: &Project, root: &str, args: &GenerateArgs, global: &GlobalArgs) -> Result<()> {
    let mut overrides = BTreeMap::new();
    for value in &args.overrides {
        let (column, parameter) = parse_override(value)?;
        if overrides.insert(column.clone(), parameter).is_some() {
            bail!("Column {column} is overridden more than once");
        }
    }

    let sql = if args.body_only {
        generate_procedure_body(
            &project.catalog,
            root,
            args.id.as_deref().unwrap_or(DEFAULT_PRIMARY_KEY_PARAMETER),
            args.output_param.as_deref(),
            &overrides,
        )
    } else {
        let options = ProcedureOptions {
            procedure_name: args.name.clone(),
            primary_key_parameter_name: args.id.clone(),
            primary_key_output_parameter_name: args.output_param.clone(),
            update_parameter_names: overrides,
        };
        generate_procedure(&project.catalog, root, &options)
    }
    .with_context(|| format!("Failed to generate copy procedure rooted at '{root}'"))?;

    match &args.out_dir {
        Some(dir) => {
            let name = procedure_name(&project.catalog, root, args.name.as_deref())?;
            let path = write_procedure(Path::new(dir), &name, &sql)?;
            println!("  ✓ {} -> {}", name, path.display());
        }
        None => println!("{sql}"),
    }

    if global.verbose {
        eprintln!("[verbose] Generated {} lines for root {root}", sql.lines().count());
    }
    Ok(())
}

/// Generate every procedure declared in deepdup.yml.
fn generate_configured(project: &Project, args: &GenerateArgs, global: &GlobalArgs) -> Result<()> {
    if project.config.procedures.is_empty() {
        bail!("No procedures configured in deepdup.yml; pass --root to generate one directly");
    }

    let output_dir = args
        .out_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| project.target_dir());

    println!(
        "Generating {} procedures...\n",
        project.config.procedures.len()
    );

    for procedure in &project.config.procedures {
        let options = options_from_config(procedure);
        let sql = generate_procedure(&project.catalog, &procedure.root, &options).with_context(
            || format!("Failed to generate copy procedure rooted at '{}'", procedure.root),
        )?;

        let name = procedure_name(&project.catalog, &procedure.root, procedure.name.as_deref())?;
        let path = write_procedure(&output_dir, &name, &sql)?;
        println!("  ✓ {name} ({})", procedure.root);

        if global.verbose {
            eprintln!("[verbose] Wrote {name} -> {}", path.display());
        }
    }

    println!(
        "\nWrote {} procedures to {}",
        project.config.procedures.len(),
        output_dir.display()
    );
    Ok(())
}

/// Name a generated procedure is filed under: the configured name or the
/// default `Copy<Singular>`.
fn procedure_name(catalog: &Catalog, root: &str, name: Option<&str>) -> Result<String> {
    match name {
        Some(name) => Ok(name.to_string()),
        None => {
            let table = catalog
                .find_table(root)
                .with_context(|| format!("Unknown root table '{root}'"))?;
            Ok(format!("Copy{}", table.singular_name()))
        }
    }
}

fn write_procedure(dir: &Path, name: &str, sql: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(format!("{name}.sql"));
    std::fs::write(&path, format!("{sql}\n"))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
