//! Column default values.
//!
//! SQLite reports a column default as the raw text of its `DEFAULT` clause.
//! [`Literal::parse`] turns that text into a typed value, and
//! [`Literal::sql_literal`] renders it back for a `DEFAULT` clause.
//!
//! Raw text defaults are stored as-is, except that a single-quoted SQL string
//! (`'abc'`) is re-quoted as `"abc"`. Quotes or escapes *inside* the string are
//! not interpreted: `'it''s'` becomes `"it''s"`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A column default value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// Signed 64-bit integer.
    Int(i64),
    /// Opaque SQL expression or string, kept as text.
    Raw(String),
    /// `true` / `false`
    Bool(bool),
    /// `CURRENT_TIME`
    CurrentTime,
    /// `CURRENT_DATE`
    CurrentDate,
    /// `CURRENT_TIMESTAMP`
    CurrentTimestamp,
    /// `NULL`
    Null,
}

impl Literal {
    /// Parse the default-value text reported by the database.
    ///
    /// Never fails: anything that is not a keyword or an integer is kept as
    /// raw text.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "null" => Literal::Null,
            "current_time" => Literal::CurrentTime,
            "current_date" => Literal::CurrentDate,
            "current_timestamp" => Literal::CurrentTimestamp,
            "true" => Literal::Bool(true),
            "false" => Literal::Bool(false),
            _ => match s.parse::<i64>() {
                Ok(v) => Literal::Int(v),
                Err(_) => Literal::Raw(requote(s)),
            },
        }
    }

    /// Render as SQL text usable in a `DEFAULT` clause.
    pub fn sql_literal(&self) -> String {
        match self {
            Literal::Int(v) => v.to_string(),
            Literal::Raw(v) => v.clone(),
            Literal::Bool(v) => v.to_string(),
            Literal::CurrentTime => "CURRENT_TIME".to_string(),
            Literal::CurrentDate => "CURRENT_DATE".to_string(),
            Literal::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
            Literal::Null => "null".to_string(),
        }
    }

    /// Returns true for `NULL` and for raw text spelling `null` in any case.
    pub fn denotes_null(&self) -> bool {
        match self {
            Literal::Null => true,
            Literal::Raw(v) => v.eq_ignore_ascii_case("null"),
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql_literal())
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

/// `'abc'` -> `"abc"`, anything else unchanged.
fn requote(s: &str) -> String {
    match s.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')) {
        Some(inner) => format!("\"{inner}\""),
        None => s.to_string(),
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.denotes_null() {
            return serializer.serialize_none();
        }
        match self {
            Literal::Int(v) => serializer.serialize_i64(*v),
            Literal::Bool(v) => serializer.serialize_bool(*v),
            Literal::Raw(v) => serializer.serialize_str(v),
            other => serializer.serialize_str(&other.sql_literal()),
        }
    }
}

impl<'de> Deserialize<'de> for Literal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LiteralVisitor)
    }
}

struct LiteralVisitor;

impl<'de> Visitor<'de> for LiteralVisitor {
    type Value = Literal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer, boolean, string or null default value")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Literal, E> {
        Ok(Literal::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Literal, E> {
        i64::try_from(v)
            .map(Literal::Int)
            .map_err(|_| E::custom(format!("default value {v} does not fit in i64")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Literal, E> {
        Ok(Literal::Raw(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Literal, E> {
        Ok(Literal::Bool(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Literal, E> {
        let marker = match v.to_ascii_uppercase().as_str() {
            "CURRENT_TIME" => Some(Literal::CurrentTime),
            "CURRENT_DATE" => Some(Literal::CurrentDate),
            "CURRENT_TIMESTAMP" => Some(Literal::CurrentTimestamp),
            _ => None,
        };
        Ok(marker.unwrap_or_else(|| Literal::Raw(v.to_string())))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Literal, E> {
        Ok(Literal::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Literal, E> {
        Ok(Literal::Null)
    }
}
