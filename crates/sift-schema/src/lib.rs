//! Database schema types for sift.
//!
//! This crate contains the in-memory schema model shared by `sift`
//! (introspection, row binding) and by callers that declare the schema they
//! expect. It has no database dependency.
//!
//! The model is a plain tree: a [`Database`] holds [`Table`]s, a table holds
//! [`Column`]s, [`Index`]es and its primary key column names. Lookups are
//! exact, case-sensitive name matches; when names collide, the first match
//! wins.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

mod check;
mod declare;
mod document;
pub mod error;
mod literal;
pub mod normalize;
mod types;

pub use check::ColumnValidation;
pub use declare::CreateFlags;
pub use error::{
    DocumentError, IncompatibleColumns, IncompatibleIndices, IndicesError, MissingColumns,
    MissingIndices, MissingTables, TableColumnsError,
};
pub use literal::Literal;
pub use normalize::{NameCase, Normalization};
pub use types::ColumnType;

/// Table schemas, typically obtained by scanning a database connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Tables in discovery order.
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// Columns, indices and key of a single table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    #[serde(rename = "table")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<Index>,
    /// Primary key column names in key order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pk: Vec<String>,
    /// Declared `WITHOUT ROWID`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub without_rowid: bool,
    /// Declared `STRICT`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strict: bool,
}

/// A table column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "ColumnType::is_untyped"
    )]
    pub column_type: ColumnType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_default"
    )]
    pub default: Option<Literal>,
    /// Free-form description, not stored in the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A table index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name; an empty name is synthesized when rendering DDL.
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unique: bool,
    /// Indexed column names in index order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
}

/// A `default` key that is present always yields `Some`, even for `null`.
fn present_default<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Literal>, D::Error> {
    Literal::deserialize(d).map(Some)
}

impl Database {
    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    /// Get a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Get a table by name, mutably.
    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    /// Validate that every named table exists.
    pub fn check_tables<I, S>(&self, names: I) -> Result<(), MissingTables>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let missing: Vec<String> = names
            .into_iter()
            .filter(|n| !self.has_table(n.as_ref()))
            .map(|n| n.as_ref().to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingTables(missing))
        }
    }
}

impl Table {
    /// Create an empty table declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indices.push(index);
        self
    }

    pub fn with_pk<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pk = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn without_rowid(mut self) -> Self {
        self.without_rowid = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns keyed by name, in table order.
    pub fn column_mapping(&self) -> IndexMap<&str, &Column> {
        let mut m = IndexMap::with_capacity(self.columns.len());
        for c in &self.columns {
            m.entry(c.name.as_str()).or_insert(c);
        }
        m
    }

    pub fn find_index(&self, name: &str) -> Option<&Index> {
        self.indices.iter().find(|i| i.name == name)
    }

    /// Indices keyed by name, in table order.
    pub fn index_mapping(&self) -> IndexMap<&str, &Index> {
        let mut m = IndexMap::with_capacity(self.indices.len());
        for i in &self.indices {
            m.entry(i.name.as_str()).or_insert(i);
        }
        m
    }

    pub fn column_names(&self) -> BTreeSet<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

impl Column {
    /// A non-nullable column without default.
    pub fn new(name: impl Into<String>, column_type: impl Into<ColumnType>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            ..Default::default()
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Literal>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Columns are compatible when their nullability matches.
    ///
    /// Type and default are not compared.
    pub fn compatible_to(&self, other: &Column) -> bool {
        self.nullable == other.nullable
    }
}

impl Index {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            unique: false,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Indices are compatible when uniqueness and the ordered column list match.
    pub fn compatible_to(&self, other: &Index) -> bool {
        self.unique == other.unique && self.columns == other.columns
    }
}
