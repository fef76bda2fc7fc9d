//! Declared column types.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Column type tag.
///
/// SQLite accepts any text as a declared type, so anything outside the
/// canonical set is kept verbatim in [`ColumnType::Other`]. Use
/// [`crate::normalize::normalize_type`] to fold vendor spellings such as
/// `BIGINT` or `varchar(32)` into the canonical set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ColumnType {
    /// No declared type.
    #[default]
    Untyped,
    Bool,
    Int,
    Int64,
    Float,
    Text,
    Blob,
    Time,
    Date,
    Timestamp,
    Uuid,
    /// Declared type outside the canonical set.
    Other(String),
}

impl ColumnType {
    /// Map a declared type string to a column type.
    ///
    /// Only exact canonical spellings are recognized here.
    pub fn from_declared(s: &str) -> Self {
        match s {
            "" => ColumnType::Untyped,
            "bool" => ColumnType::Bool,
            "int" => ColumnType::Int,
            "int64" => ColumnType::Int64,
            "float" => ColumnType::Float,
            "text" => ColumnType::Text,
            "blob" => ColumnType::Blob,
            "time" => ColumnType::Time,
            "date" => ColumnType::Date,
            "timestamp" => ColumnType::Timestamp,
            "uuid" => ColumnType::Uuid,
            other => ColumnType::Other(other.to_string()),
        }
    }

    /// The type's spelling, empty for [`ColumnType::Untyped`].
    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::Untyped => "",
            ColumnType::Bool => "bool",
            ColumnType::Int => "int",
            ColumnType::Int64 => "int64",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Blob => "blob",
            ColumnType::Time => "time",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Uuid => "uuid",
            ColumnType::Other(s) => s,
        }
    }

    pub fn is_untyped(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ColumnType {
    fn from(s: &str) -> Self {
        ColumnType::from_declared(s)
    }
}

impl Serialize for ColumnType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ColumnType::from_declared(&s))
    }
}
