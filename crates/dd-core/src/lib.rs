//! dd-core - Core library for deepdup
//!
//! This crate provides the catalog metadata model (tables, columns, foreign
//! keys), catalog and project file loading, SQL identifier helpers, and
//! foreign-key graph analysis used across all deepdup components.

pub mod catalog;
pub mod catalog_file;
pub mod config;
pub mod error;
pub mod graph;
pub mod names;
pub mod project;
pub(crate) mod serde_helpers;
pub mod sql_utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use catalog::{
    Catalog, CatalogBuilder, Column, ColumnId, ColumnRef, ForeignKey, ForeignKeyId, Table, TableId,
};
pub use catalog_file::{CatalogFile, ColumnDef, TableDef};
pub use config::{Config, ProcedureConfig};
pub use error::{CoreError, CoreResult};
pub use graph::ForeignKeyGraph;
pub use names::{ColumnName, SchemaName, TableName};
pub use project::Project;
