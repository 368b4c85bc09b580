//! T-SQL identifier and parameter utilities
//!
//! Provides bracket quoting for identifiers, parameter-name normalization,
//! and the singular-name derivation used for generated object names.

use regex::Regex;
use std::sync::LazyLock;

/// A parameter name with an optional leading `@` sigil.
static PARAMETER_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@?[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// Quote a T-SQL identifier with brackets.
///
/// Embedded closing brackets are escaped by doubling them.
///
/// # Examples
/// ```
/// use dd_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("Nations"), "[Nations]");
/// assert_eq!(quote_ident("odd]name"), "[odd]]name]");
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

/// Quote a schema-qualified object name.
///
/// # Examples
/// ```
/// use dd_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("dbo", "Nations"), "[dbo].[Nations]");
/// ```
pub fn quote_qualified(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(name))
}

/// Split an optionally schema-qualified name into (schema, name).
///
/// Uses the last `.` as the separator.
///
/// # Examples
/// ```
/// use dd_core::sql_utils::split_qualified_name;
/// assert_eq!(split_qualified_name("Nations"), (None, "Nations"));
/// assert_eq!(split_qualified_name("dbo.Nations"), (Some("dbo"), "Nations"));
/// ```
pub fn split_qualified_name(name: &str) -> (Option<&str>, &str) {
    match name.rsplit_once('.') {
        Some((schema, table)) => (Some(schema), table),
        None => (None, name),
    }
}

/// Whether `name` can be spliced into a T-SQL name without quoting.
///
/// # Examples
/// ```
/// use dd_core::sql_utils::is_valid_identifier;
/// assert!(is_valid_identifier("OrderLine"));
/// assert!(!is_valid_identifier("Order Line"));
/// ```
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

/// Whether `name` is usable as a procedure parameter, with or without `@`.
pub fn is_valid_parameter_name(name: &str) -> bool {
    PARAMETER_NAME_RE.is_match(name)
}

/// Normalize a parameter name to carry the `@` sigil.
///
/// # Examples
/// ```
/// use dd_core::sql_utils::normalize_parameter_name;
/// assert_eq!(normalize_parameter_name("toMotto"), "@toMotto");
/// assert_eq!(normalize_parameter_name("@toName"), "@toName");
/// ```
pub fn normalize_parameter_name(name: &str) -> String {
    if name.starts_with('@') {
        name.to_string()
    } else {
        format!("@{name}")
    }
}

/// Derive the singular form of an English plural table name.
///
/// Covers the regular cases only; tables with irregular plurals should set
/// `singular_name` in the catalog.
///
/// # Examples
/// ```
/// use dd_core::sql_utils::singularize;
/// assert_eq!(singularize("Provinces"), "Province");
/// assert_eq!(singularize("Companies"), "Company");
/// assert_eq!(singularize("Address"), "Address");
/// ```
pub fn singularize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with("ies") && name.len() > 3 {
        format!("{}y", &name[..name.len() - 3])
    } else if lower.ends_with("sses")
        || lower.ends_with("xes")
        || lower.ends_with("ches")
        || lower.ends_with("shes")
    {
        name[..name.len() - 2].to_string()
    } else if lower.ends_with('s') && !lower.ends_with("ss") && name.len() > 1 {
        name[..name.len() - 1].to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
