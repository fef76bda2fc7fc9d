//! SQLite schema introspection and declarative row binding.
//!
//! This crate provides:
//! - Schema introspection through SQLite's catalog pragmas ([`introspect`])
//! - Table lookup with optional names ([`orm::get_table`], [`orm::get_tables`])
//! - Declarative binding of record fields to columns ([`orm::bind`])
//! - Enumeration of table rows into bound records ([`orm::select`])
//!
//! The schema model itself lives in `sift-schema` and is re-exported as
//! [`schema`]. All database access goes through the [`Querier`] capability,
//! implemented for `rusqlite::Connection` and `rusqlite::Transaction`.
//!
//! # Example
//!
//! ```ignore
//! use sift::orm::{self, Enumerate, Fields, Record, Where};
//!
//! #[derive(Debug, Default, Clone)]
//! struct Item {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Record for Item {
//!     fn fields(fields: &mut Fields<Self>) {
//!         fields.field("id", |i| &mut i.id).field("name|title", |i| &mut i.name);
//!     }
//! }
//!
//! let table = orm::get_table(&conn, "item")?;
//! let mut items = Vec::new();
//! let opts = Enumerate::new().with(Where::new("id > ?").bind(10i64));
//! orm::select_to_vec::<Item, _, _>(&conn, &table, &opts, &mut items)?;
//! ```

pub mod config;
mod error;
pub mod introspect;
pub mod orm;
mod traced;

pub use sift_schema as schema;

pub use config::IntrospectConfig;
pub use error::{BindError, BoxError, Error};
pub use traced::{Querier, QuerierExt, TracedConn};

/// Result type for sift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Quote an identifier for use in SQL text.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
