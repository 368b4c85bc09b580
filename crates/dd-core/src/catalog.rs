//! Catalog metadata model
//!
//! A [`Catalog`] is an immutable description of tables, their columns, and
//! the foreign keys between them. Declaration order is preserved everywhere:
//! tables, columns, and foreign keys are stored in ordered sequences and
//! addressed by index-based ids, so every traversal over the catalog is
//! deterministic.

use crate::catalog_file::{ColumnDef, TableDef};
use crate::error::{CoreError, CoreResult};
use crate::names::{ColumnName, SchemaName, TableName};
use crate::sql_utils::{is_valid_identifier, singularize, split_qualified_name};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Position of a table in catalog declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TableId(usize);

impl TableId {
    /// Declaration index of the table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Position of a column within its owning table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColumnId {
    /// Owning table
    pub table: TableId,
    /// Declaration index within the table (the primary key included)
    pub index: usize,
}

/// Position of a foreign key in catalog order (owning table, then column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ForeignKeyId(usize);

impl ForeignKeyId {
    /// Catalog-wide index of the foreign key.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A column reference by name, as supplied by callers (`Table.Column`).
///
/// Unlike [`ColumnId`], a `ColumnRef` is not guaranteed to exist; resolve it
/// with [`Catalog::resolve_column`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Table name, optionally schema-qualified
    pub table: String,
    /// Column name
    pub column: String,
}

impl ColumnRef {
    /// Create a column reference.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Parse `Table.Column` or `schema.Table.Column`.
    ///
    /// Splits on the last `.`; returns `None` when either side is empty.
    pub fn parse(value: &str) -> Option<Self> {
        let (table, column) = value.rsplit_once('.')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some(Self::new(table, column))
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// A column of a table
#[derive(Debug, Clone)]
pub struct Column {
    id: ColumnId,
    name: ColumnName,
    nullable: bool,
    primary_key: bool,
    foreign_key: Option<ForeignKeyId>,
}

impl Column {
    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn name(&self) -> &ColumnName {
        &self.name
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether this is the table's auto-generated identity column
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// The foreign key this column is the source of, if any
    pub fn foreign_key(&self) -> Option<ForeignKeyId> {
        self.foreign_key
    }
}

/// A table with an integer identity primary key
#[derive(Debug, Clone)]
pub struct Table {
    id: TableId,
    schema: SchemaName,
    name: TableName,
    singular_name: String,
    primary_key: usize,
    columns: Vec<Column>,
}

impl Table {
    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn schema(&self) -> &SchemaName {
        &self.schema
    }

    pub fn name(&self) -> &TableName {
        &self.name
    }

    /// Singular form of the table name (`Provinces` -> `Province`)
    pub fn singular_name(&self) -> &str {
        &self.singular_name
    }

    /// `schema.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// All columns in declaration order, primary key included
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn primary_key(&self) -> &Column {
        &self.columns[self.primary_key]
    }

    /// Columns an `INSERT` supplies values for: everything but the identity column.
    pub fn insertable_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.primary_key)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A foreign key `(owning column, target table)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    id: ForeignKeyId,
    owner: TableId,
    column: ColumnId,
    target: TableId,
    nullable: bool,
}

impl ForeignKey {
    pub fn id(&self) -> ForeignKeyId {
        self.id
    }

    /// Table owning the foreign key column
    pub fn owner(&self) -> TableId {
        self.owner
    }

    pub fn column(&self) -> ColumnId {
        self.column
    }

    /// Table whose primary key the column holds
    pub fn target(&self) -> TableId {
        self.target
    }

    /// Nullability inherited from the owning column
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_self_reference(&self) -> bool {
        self.owner == self.target
    }
}

/// Immutable schema description: uniquely named tables and their foreign keys
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: Vec<Table>,
    by_name: HashMap<TableName, TableId>,
    foreign_keys: Vec<ForeignKey>,
    /// Reverse index: foreign keys targeting each table, in catalog order
    incoming: Vec<Vec<ForeignKeyId>>,
}

impl Catalog {
    /// Start building a catalog
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// All tables in declaration order
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Get a table by id
    pub fn table(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    /// Get a column by id
    pub fn column(&self, id: ColumnId) -> &Column {
        &self.tables[id.table.0].columns[id.index]
    }

    /// Get a foreign key by id
    pub fn foreign_key(&self, id: ForeignKeyId) -> &ForeignKey {
        &self.foreign_keys[id.0]
    }

    /// All foreign keys in catalog order
    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Find a table by name. Accepts `Table` or `schema.Table`.
    pub fn find_table(&self, name: &str) -> CoreResult<&Table> {
        let (schema, table) = split_qualified_name(name);
        self.by_name
            .get(table)
            .map(|&id| self.table(id))
            .filter(|t| schema.is_none_or(|s| t.schema == s))
            .ok_or_else(|| CoreError::TableNotFound {
                name: name.to_string(),
            })
    }

    /// Find a column of a named table
    pub fn find_column(&self, table: &str, column: &str) -> CoreResult<&Column> {
        self.find_table(table)?
            .column(column)
            .ok_or_else(|| CoreError::ColumnNotFound {
                table: table.to_string(),
                column: column.to_string(),
            })
    }

    /// Resolve a caller-supplied column reference
    pub fn resolve_column(&self, column: &ColumnRef) -> CoreResult<&Column> {
        self.find_column(&column.table, &column.column)
    }

    /// Foreign keys owned by `table`, in column declaration order
    pub fn outgoing_foreign_keys(&self, table: TableId) -> impl Iterator<Item = &ForeignKey> {
        self.table(table)
            .columns
            .iter()
            .filter_map(|c| c.foreign_key)
            .map(|id| self.foreign_key(id))
    }

    /// Foreign keys targeting `table`, ordered by owning table then column
    pub fn incoming_foreign_keys(&self, table: TableId) -> impl Iterator<Item = &ForeignKey> {
        self.incoming[table.0]
            .iter()
            .map(|&id| self.foreign_key(id))
    }

    /// The column a foreign key is declared on
    pub fn foreign_key_column(&self, fk: &ForeignKey) -> &Column {
        self.column(fk.column)
    }
}

/// Validating builder for [`Catalog`]
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    tables: Vec<TableDef>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table definition. Declaration order is preserved.
    pub fn table(mut self, table: TableDef) -> Self {
        self.tables.push(table);
        self
    }

    /// Validate the definitions and build the catalog.
    ///
    /// Fails on duplicate table or column names, empty names, foreign keys
    /// to unknown tables (a schema qualifier must match the target's schema),
    /// a nullable or referencing primary key column, and singular names that
    /// are not plain identifiers or collide with another table's.
    /// A primary key missing from the column list is added as the first column.
    pub fn build(self) -> CoreResult<Catalog> {
        let mut by_name = HashMap::with_capacity(self.tables.len());
        let schemas: Vec<String> = self.tables.iter().map(|t| t.schema.clone()).collect();
        for (index, def) in self.tables.iter().enumerate() {
            let name = TableName::try_new(def.name.as_str()).ok_or_else(|| CoreError::EmptyName {
                context: "table name in catalog".into(),
            })?;
            if by_name.insert(name, TableId(index)).is_some() {
                return Err(CoreError::DuplicateTable {
                    name: def.name.clone(),
                });
            }
        }

        let mut tables = Vec::with_capacity(self.tables.len());
        let mut foreign_keys = Vec::new();

        for (index, def) in self.tables.into_iter().enumerate() {
            let table = build_table(TableId(index), def, &by_name, &schemas, &mut foreign_keys)?;
            tables.push(table);
        }
        check_singular_names(&tables)?;

        let mut incoming = vec![Vec::new(); tables.len()];
        for fk in &foreign_keys {
            incoming[fk.target.0].push(fk.id);
        }

        log::debug!(
            "Built catalog with {} tables and {} foreign keys",
            tables.len(),
            foreign_keys.len()
        );

        Ok(Catalog {
            tables,
            by_name,
            foreign_keys,
            incoming,
        })
    }
}

fn build_table(
    id: TableId,
    def: TableDef,
    by_name: &HashMap<TableName, TableId>,
    schemas: &[String],
    foreign_keys: &mut Vec<ForeignKey>,
) -> CoreResult<Table> {
    let name = TableName::new(def.name);
    let schema = SchemaName::try_new(def.schema).ok_or_else(|| CoreError::EmptyName {
        context: format!("schema of table '{name}'"),
    })?;
    let primary_key = ColumnName::try_new(def.primary_key).ok_or_else(|| CoreError::EmptyName {
        context: format!("primary key of table '{name}'"),
    })?;

    let mut column_defs = def.columns;
    match column_defs.iter().find(|c| c.name == primary_key.as_str()) {
        Some(pk) if pk.nullable => {
            return Err(CoreError::InvalidPrimaryKey {
                table: name.to_string(),
                column: primary_key.to_string(),
                reason: "identity column must be NOT NULL".into(),
            });
        }
        Some(pk) if pk.references.is_some() => {
            return Err(CoreError::InvalidPrimaryKey {
                table: name.to_string(),
                column: primary_key.to_string(),
                reason: "identity column cannot be a foreign key".into(),
            });
        }
        Some(_) => {}
        None => column_defs.insert(0, ColumnDef::required(primary_key.as_str())),
    }

    let mut seen = HashSet::with_capacity(column_defs.len());
    let mut columns = Vec::with_capacity(column_defs.len());
    let mut primary_key_index = 0;

    for (index, def) in column_defs.into_iter().enumerate() {
        let column_id = ColumnId { table: id, index };
        let column_name = ColumnName::try_new(def.name).ok_or_else(|| CoreError::EmptyName {
            context: format!("column in table '{name}'"),
        })?;
        if !seen.insert(column_name.clone()) {
            return Err(CoreError::DuplicateColumn {
                table: name.to_string(),
                column: column_name.to_string(),
            });
        }

        let foreign_key = match def.references {
            Some(target_name) => {
                let (target_schema, target_table) = split_qualified_name(&target_name);
                let target = by_name
                    .get(target_table)
                    .copied()
                    .filter(|t| target_schema.is_none_or(|s| schemas[t.0] == s))
                    .ok_or_else(|| CoreError::UnknownReferenceTarget {
                        table: name.to_string(),
                        column: column_name.to_string(),
                        target: target_name.clone(),
                    })?;
                let fk_id = ForeignKeyId(foreign_keys.len());
                foreign_keys.push(ForeignKey {
                    id: fk_id,
                    owner: id,
                    column: column_id,
                    target,
                    nullable: def.nullable,
                });
                Some(fk_id)
            }
            None => None,
        };

        let is_primary_key = column_name == primary_key;
        if is_primary_key {
            primary_key_index = index;
        }
        columns.push(Column {
            id: column_id,
            name: column_name,
            nullable: def.nullable,
            primary_key: is_primary_key,
            foreign_key,
        });
    }

    let singular_name = def
        .singular_name
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| singularize(&name));

    Ok(Table {
        id,
        schema,
        name,
        singular_name,
        primary_key: primary_key_index,
        columns,
    })
}

/// Singular names are spliced into T-SQL variable names: each must be a plain
/// identifier, unique across the catalog ignoring case.
fn check_singular_names(tables: &[Table]) -> CoreResult<()> {
    let mut seen: HashMap<String, &Table> = HashMap::with_capacity(tables.len());
    for table in tables {
        if !is_valid_identifier(&table.singular_name) {
            return Err(CoreError::InvalidSingularName {
                table: table.name.to_string(),
                singular: table.singular_name.clone(),
            });
        }
        if let Some(first) = seen.insert(table.singular_name.to_ascii_lowercase(), table) {
            return Err(CoreError::DuplicateSingularName {
                first: first.name.to_string(),
                second: table.name.to_string(),
                singular: table.singular_name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
