//! Catalog definition files
//!
//! A catalog file describes the tables deepdup may copy:
//!
//! ```yaml
//! tables:
//!   - name: Nations
//!     columns:
//!       - name: Name
//!         nullable: false
//!   - name: Provinces
//!     columns:
//!       - name: NationID
//!         nullable: false
//!         references: Nations
//! ```

use crate::catalog::{Catalog, CatalogBuilder};
use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::{default_primary_key, default_schema, default_true};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A catalog definition file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    /// Tables in declaration order
    #[serde(default)]
    pub tables: Vec<TableDef>,
}

/// A single table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDef {
    /// Schema the table lives in
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Table name (usually plural, e.g. `Provinces`)
    pub name: String,

    /// Singular form used for procedure and variable names.
    /// Derived from `name` when omitted.
    #[serde(default)]
    pub singular_name: Option<String>,

    /// Auto-generated integer identity column
    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    /// Columns in declaration order. The primary key may be omitted.
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

/// A single column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDef {
    /// Column name
    pub name: String,

    /// Whether the column accepts NULL
    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Table whose primary key this column holds
    #[serde(default)]
    pub references: Option<String>,
}

impl TableDef {
    /// Start a table definition in the default schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: default_schema(),
            name: name.into(),
            singular_name: None,
            primary_key: default_primary_key(),
            columns: Vec::new(),
        }
    }

    /// Set the schema.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Set an explicit singular name.
    pub fn singular(mut self, singular_name: impl Into<String>) -> Self {
        self.singular_name = Some(singular_name.into());
        self
    }

    /// Set the primary key column name.
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Append a column.
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }
}

impl ColumnDef {
    /// A `NOT NULL` column.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            references: None,
        }
    }

    /// A nullable column.
    pub fn nullable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: true,
            references: None,
        }
    }

    /// Make this column a foreign key to `table`.
    pub fn references(mut self, table: impl Into<String>) -> Self {
        self.references = Some(table.into());
        self
    }
}

impl CatalogFile {
    /// Parse a catalog definition from YAML text.
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a catalog definition file from a path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::CatalogNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

        serde_yaml::from_str(&content).map_err(|e| CoreError::CatalogParseError {
            path: path.display().to_string(),
            details: e.to_string(),
        })
    }

    /// Build an immutable catalog from this definition.
    pub fn into_catalog(self) -> CoreResult<Catalog> {
        self.tables
            .into_iter()
            .fold(CatalogBuilder::new(), CatalogBuilder::table)
            .build()
    }
}

#[cfg(test)]
#[path = "catalog_file_test.rs"]
mod tests;
