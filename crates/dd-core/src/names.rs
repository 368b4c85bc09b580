//! Strongly-typed catalog identifiers.
//!
//! Every schema, table, and column name is a non-empty string. Each kind gets
//! its own wrapper so a table name cannot be passed where a column name is
//! expected.

use crate::sql_utils::quote_ident;

macro_rules! define_identifiers {
    ($( $(#[$meta:meta])* $vis:vis struct $Name:ident; )+) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String")]
        $vis struct $Name(String);

        impl $Name {
            /// Wrap a name known to be non-empty.
            ///
            /// # Panics
            /// Panics on an empty name; use [`try_new`](Self::try_new) for input.
            pub fn new(name: impl Into<String>) -> Self {
                let name = name.into();
                assert!(!name.is_empty(), concat!(stringify!($Name), " must not be empty"));
                Self(name)
            }

            pub fn try_new(name: impl Into<String>) -> Option<Self> {
                let name = name.into();
                (!name.is_empty()).then_some(Self(name))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Bracket-quoted T-SQL form (`[Name]`)
            pub fn quoted(&self) -> String {
                quote_ident(&self.0)
            }
        }

        impl TryFrom<String> for $Name {
            type Error = String;

            fn try_from(name: String) -> Result<Self, Self::Error> {
                Self::try_new(name)
                    .ok_or_else(|| concat!(stringify!($Name), " must not be empty").to_string())
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str { &self.0 }
        }

        impl PartialEq<str> for $Name {
            fn eq(&self, other: &str) -> bool { self.0 == other }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }
    )+};
}

define_identifiers! {
    /// Database schema name (e.g. `dbo`)
    pub struct SchemaName;

    /// Unqualified table name
    pub struct TableName;

    /// Column name
    pub struct ColumnName;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_empty() {
        assert!(TableName::try_new("").is_none());
        assert_eq!(TableName::try_new("Nations").unwrap(), "Nations");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let result: Result<ColumnName, _> = serde_yaml::from_str("''");
        assert!(result.is_err());
        let name: ColumnName = serde_yaml::from_str("Motto").unwrap();
        assert_eq!(name.as_str(), "Motto");
    }

    #[test]
    fn test_quoted() {
        assert_eq!(ColumnName::new("FoundedDate").quoted(), "[FoundedDate]");
        assert_eq!(TableName::new("Odd]Name").quoted(), "[Odd]]Name]");
    }

    #[test]
    fn test_borrow_allows_str_lookup() {
        let mut set = std::collections::HashSet::new();
        set.insert(SchemaName::new("dbo"));
        assert!(set.contains("dbo"));
    }
}
