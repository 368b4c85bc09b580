//! Reference classification
//!
//! Every foreign key of a copied table other than its containment parent is
//! one of:
//! - inline: the target is copied strictly earlier and the column is
//!   `NOT NULL`, so the insert can join the target's mapping directly
//! - deferred: nullable, self-referencing, or pointing at a table copied
//!   later; fixed up by an update once every insert has run
//! - external: the target is not copied at all; the value is kept as is

use crate::plan::{CopyPlan, TablePlan};
use crate::resolver::Containment;
use dd_core::Catalog;

/// Classify the references of every table in `containment`.
///
/// `captures_output` forces a mapping on the root so its new identity can be
/// read back into the output parameter.
pub fn classify(catalog: &Catalog, containment: &Containment, captures_output: bool) -> CopyPlan {
    let mut tables: Vec<TablePlan> = containment
        .order()
        .iter()
        .enumerate()
        .map(|(position, &table)| {
            let parent = containment.parent(table);
            let mut step = TablePlan {
                table,
                parent,
                inline: Vec::new(),
                deferred: Vec::new(),
                external: Vec::new(),
                requires_mapping: false,
            };

            for fk in catalog.outgoing_foreign_keys(table) {
                if Some(fk.id()) == parent {
                    continue;
                }
                if fk.is_self_reference() {
                    step.deferred.push(fk.id());
                    continue;
                }
                match containment.position(fk.target()) {
                    None => step.external.push(fk.id()),
                    Some(target) if target < position && !fk.is_nullable() => {
                        step.inline.push(fk.id())
                    }
                    Some(_) => step.deferred.push(fk.id()),
                }
            }

            log::debug!(
                "{}: {} inline, {} deferred, {} external references",
                catalog.table(table).name(),
                step.inline.len(),
                step.deferred.len(),
                step.external.len()
            );
            step
        })
        .collect();

    let mut needs_mapping = vec![false; tables.len()];
    if captures_output {
        needs_mapping[0] = true;
    }
    for (position, step) in tables.iter().enumerate() {
        if !step.deferred.is_empty() {
            needs_mapping[position] = true;
        }
        let resolved_against = step
            .parent
            .iter()
            .chain(&step.inline)
            .chain(&step.deferred);
        for &fk in resolved_against {
            if let Some(target) = containment.position(catalog.foreign_key(fk).target()) {
                needs_mapping[target] = true;
            }
        }
    }
    for (step, needed) in tables.iter_mut().zip(needs_mapping) {
        step.requires_mapping = needed;
    }

    CopyPlan {
        root: containment.root(),
        captures_output,
        tables,
    }
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
