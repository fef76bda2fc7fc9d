use sift_schema::{MissingColumns, MissingTables};
use thiserror::Error;

/// Boxed error returned by per-row callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A failure while scanning the schema of a specific table.
    #[error("table {table}: {source}")]
    InTable { table: String, source: Box<Error> },

    #[error("table {table} does not exist")]
    TableDoesNotExist { table: String },

    /// The table is listed in the catalog but reports no columns.
    #[error("table {table} has an empty schema")]
    EmptyTableSchema { table: String },

    #[error(transparent)]
    MissingTables(#[from] MissingTables),

    #[error("binding table {table}: {source}")]
    Binding { table: String, source: BindError },

    /// Building or executing the enumeration statement failed.
    #[error("querying table {table}: {source}")]
    Query {
        table: String,
        source: rusqlite::Error,
    },

    /// Reading a row into the bound record failed.
    #[error("scanning table {table}: {source}")]
    Scan {
        table: String,
        source: rusqlite::Error,
    },

    /// The per-row callback returned an error.
    #[error("scanning table {table}: {source}")]
    Callback { table: String, source: BoxError },
}

impl Error {
    /// Attach the table name to an error raised while working on it.
    pub fn in_table(self, table: &str) -> Error {
        Error::InTable {
            table: table.to_string(),
            source: Box::new(self),
        }
    }
}

/// Reasons a record type cannot be bound to a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// Mandatory fields whose columns are absent, all of them.
    #[error(transparent)]
    MissingColumns(#[from] MissingColumns),

    #[error("failed to produce any field bindings")]
    NoBindingsProduced,

    #[error("invalid binding directive {directive:?}")]
    InvalidDirective { directive: String },
}
