//! Shared serde helper functions used across multiple modules.

/// Serde default function that returns `true`.
///
/// Used for column nullability, which follows the SQL default of `NULL`.
pub fn default_true() -> bool {
    true
}

/// Default schema for tables that do not name one.
pub fn default_schema() -> String {
    "dbo".to_string()
}

/// Default primary key column name.
pub fn default_primary_key() -> String {
    "ID".to_string()
}
