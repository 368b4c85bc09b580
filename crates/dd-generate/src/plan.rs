//! Copy plan: the classified, ordered input the emitter renders
//!
//! A [`CopyPlan`] is pure data. The resolver decides order and containment
//! parents, the classifier fills in reference lists and mapping requirements,
//! and the emitter walks the result without making further decisions.

use dd_core::{Catalog, ForeignKeyId, Table, TableId};
use serde::Serialize;
use std::fmt;

/// How a foreign key is handled in the copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Defines which rows belong to the copy; joined as `j0`
    Containment,
    /// Remapped during the owning table's insert through an extra join
    Inline,
    /// Remapped by an `UPDATE` after every insert has run
    Deferred,
    /// Target is outside the copy; the value is copied unchanged
    External,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Containment => write!(f, "containment"),
            ReferenceKind::Inline => write!(f, "inline"),
            ReferenceKind::Deferred => write!(f, "deferred"),
            ReferenceKind::External => write!(f, "external"),
        }
    }
}

/// Classified copy step for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePlan {
    /// Table being copied
    pub table: TableId,
    /// Containment parent; `None` only for the root
    pub parent: Option<ForeignKeyId>,
    /// Inline references in declaration order; the n-th is joined as `j{n+1}`
    pub inline: Vec<ForeignKeyId>,
    /// Deferred references in declaration order; the n-th is joined as `j{n}`
    /// in the table's update statement
    pub deferred: Vec<ForeignKeyId>,
    /// References to tables outside the copy
    pub external: Vec<ForeignKeyId>,
    /// Whether an ID-pair mapping table is declared and filled for this table
    pub requires_mapping: bool,
}

impl TablePlan {
    /// Joins of the insert statement as `(alias, foreign key)`: the
    /// containment parent as 0, then inline references from 1.
    pub fn insert_joins(&self) -> impl Iterator<Item = (usize, ForeignKeyId)> + '_ {
        self.parent.into_iter().chain(self.inline.iter().copied()).enumerate()
    }

    /// Kind of a foreign key owned by this table, if it is one of them
    pub fn kind_of(&self, fk: ForeignKeyId) -> Option<ReferenceKind> {
        if self.parent == Some(fk) {
            Some(ReferenceKind::Containment)
        } else if self.inline.contains(&fk) {
            Some(ReferenceKind::Inline)
        } else if self.deferred.contains(&fk) {
            Some(ReferenceKind::Deferred)
        } else if self.external.contains(&fk) {
            Some(ReferenceKind::External)
        } else {
            None
        }
    }
}

/// Ordered, classified plan for one rooted copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlan {
    /// Root table
    pub root: TableId,
    /// Whether the root's new identity is captured into an output parameter
    pub captures_output: bool,
    /// Copy steps in emission order, root first
    pub tables: Vec<TablePlan>,
}

impl CopyPlan {
    /// Step for a table, if the table is part of the copy
    pub fn table(&self, table: TableId) -> Option<&TablePlan> {
        self.tables.iter().find(|t| t.table == table)
    }

    /// Whether the table is part of the copy
    pub fn contains(&self, table: TableId) -> bool {
        self.table(table).is_some()
    }

    /// Tables that declare a mapping, in emission order
    pub fn mapped_tables(&self) -> impl Iterator<Item = &TablePlan> {
        self.tables.iter().filter(|t| t.requires_mapping)
    }

    /// Tables that own deferred references, in emission order
    pub fn deferred_tables(&self) -> impl Iterator<Item = &TablePlan> {
        self.tables.iter().filter(|t| !t.deferred.is_empty())
    }

    /// Human-oriented description of the plan with names instead of ids
    pub fn describe(&self, catalog: &Catalog) -> Vec<TableSummary> {
        self.tables
            .iter()
            .map(|step| {
                let table = catalog.table(step.table);
                let mut inline_alias = 0;
                let mut deferred_alias = 0;
                let references = catalog
                    .outgoing_foreign_keys(step.table)
                    .filter_map(|fk| {
                        let kind = step.kind_of(fk.id())?;
                        let alias = match kind {
                            ReferenceKind::Containment => Some("j0".to_string()),
                            ReferenceKind::Inline => {
                                inline_alias += 1;
                                Some(format!("j{inline_alias}"))
                            }
                            ReferenceKind::Deferred => {
                                let alias = format!("j{deferred_alias}");
                                deferred_alias += 1;
                                Some(alias)
                            }
                            ReferenceKind::External => None,
                        };
                        Some(ReferenceSummary {
                            column: catalog.foreign_key_column(fk).name().to_string(),
                            target: catalog.table(fk.target()).qualified_name(),
                            kind,
                            alias,
                        })
                    })
                    .collect();

                TableSummary {
                    table: table.qualified_name(),
                    mapping: step.requires_mapping.then(|| mapping_variable(table)),
                    references,
                }
            })
            .collect()
    }
}

/// Name-based summary of one copy step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    /// `schema.table`
    pub table: String,
    /// Mapping table variable, when declared
    pub mapping: Option<String>,
    /// Foreign keys in declaration order
    pub references: Vec<ReferenceSummary>,
}

/// Name-based summary of one foreign key in a copy step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceSummary {
    pub column: String,
    pub target: String,
    pub kind: ReferenceKind,
    /// Join alias in the statement resolving the reference
    pub alias: Option<String>,
}

/// Variable name of a table's ID-pair mapping table (`@NationIDPairs`)
pub fn mapping_variable(table: &Table) -> String {
    format!("@{}IDPairs", table.singular_name())
}

