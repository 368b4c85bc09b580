//! Error types for dd-core

use thiserror::Error;

/// Core error type for deepdup
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Catalog file not found
    #[error("[E003] Catalog file not found: {path}")]
    CatalogNotFound { path: String },

    /// E004: Failed to parse a catalog file
    #[error("[E004] Failed to parse catalog file {path}: {details}")]
    CatalogParseError { path: String, details: String },

    /// E005: Duplicate table name in a catalog
    #[error("[E005] Duplicate table name: {name}")]
    DuplicateTable { name: String },

    /// E006: Duplicate column name within a table
    #[error("[E006] Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// E007: Foreign key points at a table that is not in the catalog
    #[error("[E007] Foreign key {table}.{column} references unknown table '{target}'")]
    UnknownReferenceTarget {
        table: String,
        column: String,
        target: String,
    },

    /// E008: Invalid primary key column
    #[error("[E008] Invalid primary key '{column}' in table '{table}': {reason}")]
    InvalidPrimaryKey {
        table: String,
        column: String,
        reason: String,
    },

    /// E009: Empty identifier
    #[error("[E009] Empty name: {context}")]
    EmptyName { context: String },

    /// E010: Table lookup failed
    #[error("[E010] Table not found: {name}")]
    TableNotFound { name: String },

    /// E011: Column lookup failed
    #[error("[E011] Column not found: {table}.{column}")]
    ColumnNotFound { table: String, column: String },

    /// E012: IO error
    #[error("[E012] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E013: IO error with file path context
    #[error("[E013] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E014: YAML parse error
    #[error("[E014] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// E015: Singular name unusable in generated variable names
    #[error("[E015] Singular name '{singular}' of table '{table}' must be a plain identifier")]
    InvalidSingularName { table: String, singular: String },

    /// E016: Two tables share a singular name
    #[error("[E016] Tables '{first}' and '{second}' share the singular name '{singular}'")]
    DuplicateSingularName {
        first: String,
        second: String,
        singular: String,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
