//! Aggregated schema errors.
//!
//! Every error here carries the full list of offending names so callers can
//! react to all of them at once (e.g. create only the missing tables).

use std::fmt;
use thiserror::Error;

/// Tables that were required but not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("missing tables: {}", .0.join(", "))]
pub struct MissingTables(pub Vec<String>);

/// Columns that were required but not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("missing columns: {}", .0.join(", "))]
pub struct MissingColumns(pub Vec<String>);

/// Columns that exist but do not match the required signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("incompatible columns: {}", .0.join(", "))]
pub struct IncompatibleColumns(pub Vec<String>);

/// Indices that were required but not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("missing indices: {}", .0.join(", "))]
pub struct MissingIndices(pub Vec<String>);

/// Indices that exist but do not match the required signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("incompatible indices: {}", .0.join(", "))]
pub struct IncompatibleIndices(pub Vec<String>);

macro_rules! name_list {
    ($($ty:ident),*) => {$(
        impl $ty {
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn names(&self) -> &[String] {
                &self.0
            }
        }

        impl From<Vec<String>> for $ty {
            fn from(names: Vec<String>) -> Self {
                Self(names)
            }
        }
    )*};
}

name_list!(
    MissingTables,
    MissingColumns,
    IncompatibleColumns,
    MissingIndices,
    IncompatibleIndices
);

/// Missing and incompatible columns of a table, both sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableColumnsError {
    pub missing: MissingColumns,
    pub incompatible: IncompatibleColumns,
}

/// Missing and incompatible indices of a table, both sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicesError {
    pub missing: MissingIndices,
    pub incompatible: IncompatibleIndices,
}

impl fmt::Display for TableColumnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("incompatible table schema")?;
        if !self.missing.is_empty() {
            write!(f, ", {}", self.missing)?;
        }
        if !self.incompatible.is_empty() {
            write!(f, ", {}", self.incompatible)?;
        }
        Ok(())
    }
}

impl std::error::Error for TableColumnsError {}

impl fmt::Display for IndicesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("incompatible table indices")?;
        if !self.missing.is_empty() {
            write!(f, ", {}", self.missing)?;
        }
        if !self.incompatible.is_empty() {
            write!(f, ", {}", self.incompatible)?;
        }
        Ok(())
    }
}

impl std::error::Error for IndicesError {}

/// Failure reading a serialized schema document.
#[derive(Debug, Error)]
#[error("invalid schema document: {0}")]
pub struct DocumentError(#[from] pub serde_json::Error);
