//! Foreign-key graph analysis
//!
//! The catalog's foreign keys form a general directed graph that may contain
//! cycles (self-references, mutual references). This module wraps it in a
//! petgraph graph for referencing-table and cycle diagnostics. It never feeds
//! generation order; that is fixed by declaration order in the catalog.

use crate::catalog::{Catalog, ForeignKeyId, TableId};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::BTreeSet;

/// Directed graph of tables, one edge per foreign key (owner -> target)
#[derive(Debug)]
pub struct ForeignKeyGraph {
    graph: DiGraph<TableId, ForeignKeyId>,
}

impl ForeignKeyGraph {
    /// Build the graph for a catalog. Node indices match table ids.
    pub fn build(catalog: &Catalog) -> Self {
        let mut graph = DiGraph::with_capacity(catalog.len(), catalog.foreign_keys().len());
        for table in catalog.tables() {
            graph.add_node(table.id());
        }
        for fk in catalog.foreign_keys() {
            graph.add_edge(
                NodeIndex::new(fk.owner().index()),
                NodeIndex::new(fk.target().index()),
                fk.id(),
            );
        }
        Self { graph }
    }

    /// Tables holding a foreign key to `table`, sorted and deduplicated
    pub fn referencing_tables(&self, table: TableId) -> Vec<TableId> {
        let set: BTreeSet<TableId> = self
            .graph
            .edges_directed(NodeIndex::new(table.index()), Direction::Incoming)
            .map(|e| self.graph[e.source()])
            .collect();
        set.into_iter().collect()
    }

    /// Groups of tables that reference each other in a cycle.
    ///
    /// A group is either several mutually reachable tables or a single
    /// self-referencing table. Tables within a group and the groups
    /// themselves are sorted by declaration order.
    pub fn cycles(&self) -> Vec<Vec<TableId>> {
        let mut cycles: Vec<Vec<TableId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&idx| self.graph.contains_edge(idx, idx))
            })
            .map(|component| {
                let mut tables: Vec<TableId> =
                    component.into_iter().map(|idx| self.graph[idx]).collect();
                tables.sort();
                tables
            })
            .collect();
        cycles.sort();
        cycles
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
