//! dd-generate - Rooted deep-copy procedure generation
//!
//! Given a catalog and a root table, this crate emits a T-SQL stored
//! procedure that copies one root row and every row contained by it,
//! remapping foreign keys between the copies. Generation is a pure
//! validate-then-render pipeline:
//!
//! 1. [`resolver`] picks the copied tables, their containment parents, and
//!    the emission order.
//! 2. [`classifier`] sorts the remaining foreign keys into inline, deferred,
//!    and external references and decides which tables need a mapping.
//! 3. [`options`] validates and normalizes caller customization.
//! 4. The emitter renders the plan to text.
//!
//! All errors surface before any text is produced.

pub mod classifier;
mod emitter;
pub mod error;
pub mod options;
pub mod plan;
pub mod resolver;

pub use error::{GenerateError, GenerateResult};
pub use options::ProcedureOptions;
pub use plan::{CopyPlan, ReferenceKind, ReferenceSummary, TablePlan, TableSummary};

use dd_core::{Catalog, ColumnRef};
use options::{resolve_options, ResolvedOptions};
use std::collections::BTreeMap;

/// Resolve and classify the copy rooted at `root_table`.
pub fn plan(catalog: &Catalog, root_table: &str, captures_output: bool) -> GenerateResult<CopyPlan> {
    let root = catalog
        .find_table(root_table)
        .map_err(GenerateError::from_lookup)?;
    let containment = resolver::resolve(catalog, root.id())?;
    Ok(classifier::classify(catalog, &containment, captures_output))
}

fn prepare(
    catalog: &Catalog,
    root_table: &str,
    options: &ProcedureOptions,
) -> GenerateResult<(CopyPlan, ResolvedOptions)> {
    let root = catalog
        .find_table(root_table)
        .map_err(GenerateError::from_lookup)?;
    let containment = resolver::resolve(catalog, root.id())?;
    let resolved = resolve_options(catalog, root, &containment, options)?;
    let plan = classifier::classify(
        catalog,
        &containment,
        resolved.output_parameter.is_some(),
    );
    Ok((plan, resolved))
}

/// Generate a complete `CREATE PROCEDURE` statement copying the subtree
/// rooted at one row of `root_table`.
///
/// # Examples
/// ```
/// use dd_core::{Catalog, ColumnDef, TableDef};
/// use dd_generate::{generate_procedure, ProcedureOptions};
///
/// let catalog = Catalog::builder()
///     .table(TableDef::new("Nations").column(ColumnDef::required("Name")))
///     .build()
///     .unwrap();
/// let sql = generate_procedure(&catalog, "Nations", &ProcedureOptions::default()).unwrap();
/// assert!(sql.starts_with("CREATE PROCEDURE [dbo].[CopyNation]"));
/// ```
pub fn generate_procedure(
    catalog: &Catalog,
    root_table: &str,
    options: &ProcedureOptions,
) -> GenerateResult<String> {
    let (plan, resolved) = prepare(catalog, root_table, options)?;
    log::debug!(
        "Rendering {}.{} over {} tables",
        resolved.schema,
        resolved.procedure_name,
        plan.tables.len()
    );
    Ok(emitter::render_procedure(catalog, &plan, &resolved))
}

/// Generate only the procedure body: mapping declarations, copy statements,
/// and deferred updates, without header or transaction handling, for
/// composition into a larger procedure.
pub fn generate_procedure_body(
    catalog: &Catalog,
    root_table: &str,
    primary_key_parameter_name: &str,
    primary_key_output_parameter_name: Option<&str>,
    update_parameter_names: &BTreeMap<ColumnRef, String>,
) -> GenerateResult<String> {
    let options = ProcedureOptions {
        procedure_name: None,
        primary_key_parameter_name: Some(primary_key_parameter_name.to_string()),
        primary_key_output_parameter_name: primary_key_output_parameter_name.map(str::to_string),
        update_parameter_names: update_parameter_names.clone(),
    };
    let (plan, resolved) = prepare(catalog, root_table, &options)?;
    Ok(emitter::render_body(catalog, &plan, &resolved))
}
