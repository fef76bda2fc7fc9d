//! Normalization helpers.
//!
//! SQLite keeps declared types and names exactly as written, while callers
//! usually compare against a canonical spelling. These helpers fold a scanned
//! schema into that canonical form.

use crate::{Column, ColumnType, Database, Table};
use serde::{Deserialize, Serialize};

/// Map vendor and alias type spellings onto the canonical set.
///
/// Matching is case-insensitive. Unrecognized types are returned unchanged.
pub fn normalize_type(t: &ColumnType) -> ColumnType {
    let m = t.as_str().to_ascii_lowercase();
    match m.as_str() {
        "int" | "integer" | "tinyint" | "smallint" | "mediumint" => ColumnType::Int,
        "int64" | "bigint" => ColumnType::Int64,
        "boolean" | "bool" => ColumnType::Bool,
        "real" | "double" | "float" => ColumnType::Float,
        "blob" => ColumnType::Blob,
        "text" | "string" | "clob" => ColumnType::Text,
        "date" => ColumnType::Date,
        "time" => ColumnType::Time,
        "datetime" | "timestamp" => ColumnType::Timestamp,
        "uuid" | "guid" => ColumnType::Uuid,
        _ if ["character(", "varchar(", "nchar(", "nvarchar("]
            .iter()
            .any(|p| m.starts_with(p)) =>
        {
            ColumnType::Text
        }
        _ => t.clone(),
    }
}

/// Drop a `NULL` default from a nullable column; it carries no information.
pub fn normalize_default(c: &mut Column) {
    if c.nullable && c.default.as_ref().is_some_and(|d| d.denotes_null()) {
        c.default = None;
    }
}

/// Target case for [`normalize_names`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    Upper,
    Lower,
}

impl NameCase {
    pub fn apply(self, s: &str) -> String {
        match self {
            NameCase::Upper => s.to_uppercase(),
            NameCase::Lower => s.to_lowercase(),
        }
    }
}

/// Fold table, column and index names to one case.
///
/// Primary key entries and index column references are folded too, so they
/// keep pointing at the renamed columns.
pub fn normalize_names(t: &mut Table, case: NameCase) {
    t.name = case.apply(&t.name);
    for c in &mut t.columns {
        c.name = case.apply(&c.name);
    }
    for i in &mut t.indices {
        i.name = case.apply(&i.name);
        for col in &mut i.columns {
            *col = case.apply(col);
        }
    }
    for k in &mut t.pk {
        *k = case.apply(k);
    }
}

pub fn sort_columns(t: &mut Table) {
    t.columns.sort_by(|a, b| a.name.cmp(&b.name));
}

pub fn sort_indices(t: &mut Table) {
    t.indices.sort_by(|a, b| a.name.cmp(&b.name));
}

pub fn sort_tables(tables: &mut [Table]) {
    tables.sort_by(|a, b| a.name.cmp(&b.name));
}

/// A set of normalization steps to apply in one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalization {
    pub types: bool,
    pub defaults: bool,
    pub names: Option<NameCase>,
    pub sort: bool,
}

impl Normalization {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_table(&self, t: &mut Table) {
        for c in &mut t.columns {
            if self.types {
                c.column_type = normalize_type(&c.column_type);
            }
            if self.defaults {
                normalize_default(c);
            }
        }
        if let Some(case) = self.names {
            normalize_names(t, case);
        }
        if self.sort {
            sort_columns(t);
            sort_indices(t);
        }
    }

    pub fn apply(&self, db: &mut Database) {
        for t in &mut db.tables {
            self.apply_table(t);
        }
        if self.sort {
            sort_tables(&mut db.tables);
        }
    }
}
