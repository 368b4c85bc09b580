//! Containment resolution
//!
//! Decides which tables belong to a rooted copy and which single foreign key
//! ties each of them to its parent. Only non-nullable, non-self foreign keys
//! are containment candidates. The copy scope is the smallest set holding the
//! root and every table with a candidate pointing into the set; each table's
//! parent is its first candidate (column declaration order) that points into
//! the scope. The emission order is a breadth-first walk of that parent tree,
//! siblings in catalog declaration order.

use crate::error::{GenerateError, GenerateResult};
use dd_core::{Catalog, ForeignKey, ForeignKeyId, TableId};
use std::collections::{HashMap, VecDeque};

/// Containment forest for one root, derived without touching the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Containment {
    root: TableId,
    order: Vec<TableId>,
    parents: HashMap<TableId, ForeignKeyId>,
    positions: HashMap<TableId, usize>,
}

impl Containment {
    pub fn root(&self) -> TableId {
        self.root
    }

    /// Tables in emission order, root first
    pub fn order(&self) -> &[TableId] {
        &self.order
    }

    /// Containment parent foreign key of a non-root table
    pub fn parent(&self, table: TableId) -> Option<ForeignKeyId> {
        self.parents.get(&table).copied()
    }

    /// Position of a table in the emission order
    pub fn position(&self, table: TableId) -> Option<usize> {
        self.positions.get(&table).copied()
    }

    pub fn contains(&self, table: TableId) -> bool {
        self.positions.contains_key(&table)
    }
}

fn is_candidate(fk: &ForeignKey) -> bool {
    !fk.is_nullable() && !fk.is_self_reference()
}

/// Resolve the containment forest rooted at `root`.
pub fn resolve(catalog: &Catalog, root: TableId) -> GenerateResult<Containment> {
    let mut in_scope = vec![false; catalog.len()];
    in_scope[root.index()] = true;

    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        for fk in catalog.incoming_foreign_keys(current) {
            if is_candidate(fk) && !in_scope[fk.owner().index()] {
                in_scope[fk.owner().index()] = true;
                queue.push_back(fk.owner());
            }
        }
    }

    let mut parents = HashMap::new();
    let mut children: HashMap<TableId, Vec<TableId>> = HashMap::new();
    for table in catalog.tables() {
        let id = table.id();
        if id == root || !in_scope[id.index()] {
            continue;
        }
        let parent = catalog
            .outgoing_foreign_keys(id)
            .find(|fk| is_candidate(fk) && in_scope[fk.target().index()]);
        if let Some(fk) = parent {
            log::debug!(
                "{} is contained by {} through {}",
                table.name(),
                catalog.table(fk.target()).name(),
                catalog.foreign_key_column(fk).name()
            );
            parents.insert(id, fk.id());
            children.entry(fk.target()).or_default().push(id);
        }
    }

    let mut order = Vec::new();
    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        order.push(current);
        if let Some(kids) = children.get(&current) {
            queue.extend(kids.iter().copied());
        }
    }

    let scope_size = in_scope.iter().filter(|&&b| b).count();
    if order.len() != scope_size {
        let unreachable: Vec<&str> = catalog
            .tables()
            .iter()
            .filter(|t| in_scope[t.id().index()] && !order.contains(&t.id()))
            .map(|t| t.name().as_str())
            .collect();
        return Err(GenerateError::AmbiguousRoot {
            root: catalog.table(root).name().to_string(),
            tables: unreachable.join(", "),
        });
    }

    let positions = order.iter().enumerate().map(|(i, &t)| (t, i)).collect();

    log::debug!(
        "Copy rooted at {} covers {} tables",
        catalog.table(root).name(),
        order.len()
    );

    Ok(Containment {
        root,
        order,
        parents,
        positions,
    })
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
