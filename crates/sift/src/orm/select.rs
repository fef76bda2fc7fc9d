//! Enumerate table rows into bound records.

use super::TableColumns;
use super::bind::{Bindings, Record, bind};
use crate::traced::Querier;
use crate::{BoxError, Error, Result, quote_ident};
use rusqlite::ToSql;
use rusqlite::types::Value;
use tracing::debug;

/// Builds the statement used to enumerate a table.
pub trait Options {
    /// The full `select` statement for `table` and its bound columns.
    fn sql(&self, table: &str, selectors: &[String]) -> String;

    /// Positional arguments for the statement.
    fn args(&self) -> &[Value];
}

/// A clause appended after `select ... from <table>`.
pub trait Condition {
    fn sql(&self) -> (String, Vec<Value>);
}

/// `where <expr>` with positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Where {
    expr: String,
    args: Vec<Value>,
}

impl Where {
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            args: Vec::new(),
        }
    }

    /// Add the value for the next `?` placeholder.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }
}

impl Condition for Where {
    fn sql(&self) -> (String, Vec<Value>) {
        (format!("where {}", self.expr), self.args.clone())
    }
}

/// `order by <column> asc|desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    column: String,
    descending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

impl Condition for OrderBy {
    fn sql(&self) -> (String, Vec<Value>) {
        let direction = if self.descending { "desc" } else { "asc" };
        let sql = format!("order by {} {}", quote_ident(&self.column), direction);
        (sql, Vec::new())
    }
}

/// `limit ?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(pub i64);

impl Condition for Limit {
    fn sql(&self) -> (String, Vec<Value>) {
        ("limit ?".to_string(), vec![Value::Integer(self.0)])
    }
}

/// Default [`Options`]: `select <selectors> from <table> <conditions>`.
///
/// Table and column names are quoted; condition text is used as given.
/// Conditions are appended in the order they are added, and so are their
/// arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enumerate {
    tail: String,
    args: Vec<Value>,
}

impl Enumerate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, condition: impl Condition) -> Self {
        let (sql, args) = condition.sql();
        if !sql.is_empty() {
            if !self.tail.is_empty() {
                self.tail.push(' ');
            }
            self.tail.push_str(&sql);
        }
        self.args.extend(args);
        self
    }
}

impl Options for Enumerate {
    fn sql(&self, table: &str, selectors: &[String]) -> String {
        let columns: Vec<String> = selectors.iter().map(|s| quote_ident(s)).collect();
        let mut sql = format!("select {} from {}", columns.join(", "), quote_ident(table));
        if !self.tail.is_empty() {
            sql.push(' ');
            sql.push_str(&self.tail);
        }
        sql
    }

    fn args(&self) -> &[Value] {
        &self.args
    }
}

/// A record type bound to one table, reusable across enumerations.
pub struct Selector<T> {
    table: String,
    bindings: Bindings<T>,
}

impl<T: Record> Selector<T> {
    pub fn new(table: &TableColumns) -> Result<Self> {
        let bindings = bind::<T>(table).map_err(|source| Error::Binding {
            table: table.name.clone(),
            source,
        })?;
        Ok(Self {
            table: table.name.clone(),
            bindings,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn bindings(&self) -> &Bindings<T> {
        &self.bindings
    }

    /// Run the statement built by `opts` and call `on_row` once per row.
    ///
    /// One record is reused for the whole enumeration: every row overwrites
    /// the bound fields, and fields that are not bound keep their values.
    /// Copy what must outlive the callback.
    pub fn select<Q, O, F>(&self, src: &Q, opts: &O, mut on_row: F) -> Result<()>
    where
        Q: Querier,
        O: Options + ?Sized,
        F: FnMut(&T) -> std::result::Result<(), BoxError>,
    {
        let sql = opts.sql(&self.table, self.bindings.selectors());
        let params: Vec<&dyn ToSql> = opts.args().iter().map(|v| v as &dyn ToSql).collect();
        debug!(table = %self.table, %sql, "enumerating table");

        let mut record = T::default();
        src.query(&sql, &params, &mut |row| {
            if let Err(source) = self.bindings.scan(&mut record, row) {
                return Err(Error::Scan {
                    table: self.table.clone(),
                    source,
                });
            }
            on_row(&record).map_err(|source| Error::Callback {
                table: self.table.clone(),
                source,
            })
        })
        .map_err(|e| match e {
            Error::Sqlite(source) => Error::Query {
                table: self.table.clone(),
                source,
            },
            other => other,
        })
    }
}

/// Bind `T` to `table` and enumerate it once.
pub fn select<T, Q, O, F>(src: &Q, table: &TableColumns, opts: &O, on_row: F) -> Result<()>
where
    T: Record,
    Q: Querier,
    O: Options + ?Sized,
    F: FnMut(&T) -> std::result::Result<(), BoxError>,
{
    Selector::<T>::new(table)?.select(src, opts, on_row)
}

/// Enumerate `table` and append a copy of every record to `dst`.
pub fn select_to_vec<T, Q, O>(
    src: &Q,
    table: &TableColumns,
    opts: &O,
    dst: &mut Vec<T>,
) -> Result<()>
where
    T: Record + Clone,
    Q: Querier,
    O: Options + ?Sized,
{
    select(src, table, opts, |record: &T| {
        dst.push(record.clone());
        Ok(())
    })
}
