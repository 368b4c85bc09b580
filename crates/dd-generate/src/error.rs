//! Error types for dd-generate

use dd_core::CoreError;
use thiserror::Error;

/// Procedure generation errors.
///
/// Every variant is raised before any SQL text is produced.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// G001: Root or customization names a table missing from the catalog
    #[error("[G001] Unknown table: {name}")]
    UnknownTable { name: String },

    /// G002: Customization names a column missing from its table
    #[error("[G002] Unknown column: {table}.{column}")]
    UnknownColumn { table: String, column: String },

    /// G003: Containment parents of some tables never lead back to the root
    #[error("[G003] Root '{root}' has no well-defined containment traversal; unreachable tables: {tables}")]
    AmbiguousRoot { root: String, tables: String },

    /// G004: Override supplied for a column that cannot take one
    #[error("[G004] Cannot override {table}.{column}: {reason}")]
    CustomizationConflict {
        table: String,
        column: String,
        reason: String,
    },

    /// G005: Malformed procedure or parameter name
    #[error("[G005] Invalid {context} '{name}'")]
    InvalidName { context: String, name: String },

    /// G006: Catalog failure other than a missing table or column
    #[error("[G006] Catalog error: {0}")]
    Catalog(#[source] CoreError),
}

impl GenerateError {
    /// Translate a catalog lookup failure into an unknown-identifier error.
    ///
    /// Anything other than a missing table or column passes through as
    /// [`GenerateError::Catalog`].
    pub(crate) fn from_lookup(err: CoreError) -> Self {
        match err {
            CoreError::TableNotFound { name } => Self::UnknownTable { name },
            CoreError::ColumnNotFound { table, column } => Self::UnknownColumn { table, column },
            other => Self::Catalog(other),
        }
    }
}

/// Result type alias for GenerateError
pub type GenerateResult<T> = Result<T, GenerateError>;

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
