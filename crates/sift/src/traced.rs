//! Connection capability and its traced wrapper.
//!
//! Everything in this crate talks to the database through [`Querier`], a
//! minimal "run a query, visit its rows" capability. It is implemented for
//! `rusqlite::Connection` and `rusqlite::Transaction`; the caller decides the
//! transactional scope.

use crate::Result;
use rusqlite::types::FromSql;
use rusqlite::{Connection, Row, ToSql, Transaction};

/// A synchronous query runner.
pub trait Querier {
    /// Run `sql` and call `on_row` for every returned row.
    ///
    /// Stops at the first error. The row cursor is released on every exit
    /// path.
    fn query(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
        on_row: &mut dyn FnMut(&Row<'_>) -> Result<()>,
    ) -> Result<()>;

    /// Run `sql` and call `on_row` for its first row only.
    ///
    /// Returns `QueryReturnedNoRows` when the query yields nothing.
    fn query_first(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
        on_row: &mut dyn FnMut(&Row<'_>) -> Result<()>,
    ) -> Result<()> {
        let mut seen = false;
        self.query(sql, params, &mut |row| {
            if seen {
                return Ok(());
            }
            seen = true;
            on_row(row)
        })?;
        if seen {
            Ok(())
        } else {
            Err(rusqlite::Error::QueryReturnedNoRows.into())
        }
    }
}

impl Querier for Connection {
    fn query(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
        on_row: &mut dyn FnMut(&Row<'_>) -> Result<()>,
    ) -> Result<()> {
        let mut stmt = self.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        while let Some(row) = rows.next()? {
            on_row(row)?;
        }
        Ok(())
    }
}

impl Querier for Transaction<'_> {
    fn query(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
        on_row: &mut dyn FnMut(&Row<'_>) -> Result<()>,
    ) -> Result<()> {
        Querier::query(&**self, sql, params, on_row)
    }
}

/// A wrapper around a [`Querier`] that logs every query via tracing.
///
/// # Example
///
/// ```ignore
/// use sift::QuerierExt;
///
/// let conn = rusqlite::Connection::open_in_memory()?;
/// let db = sift::introspect::scan(&conn.traced())?;
/// ```
pub struct TracedConn<'a, Q: Querier> {
    conn: &'a Q,
}

impl<'a, Q: Querier> TracedConn<'a, Q> {
    pub fn new(conn: &'a Q) -> Self {
        Self { conn }
    }

    /// Get the wrapped connection.
    pub fn inner(&self) -> &'a Q {
        self.conn
    }
}

impl<Q: Querier> Querier for TracedConn<'_, Q> {
    fn query(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
        on_row: &mut dyn FnMut(&Row<'_>) -> Result<()>,
    ) -> Result<()> {
        let span = tracing::debug_span!(
            "db.query",
            sql = %sql,
            params = params.len(),
            rows = tracing::field::Empty,
        );
        let _enter = span.enter();
        let mut rows = 0u64;
        let result = self.conn.query(sql, params, &mut |row| {
            rows += 1;
            on_row(row)
        });
        span.record("rows", rows);
        result
    }
}

/// Convenience methods available on every [`Querier`].
pub trait QuerierExt: Querier + Sized {
    /// Wrap this connection in a `TracedConn` for query logging.
    fn traced(&self) -> TracedConn<'_, Self> {
        TracedConn::new(self)
    }

    /// Read the first column of the first row.
    fn scalar<T: FromSql>(&self, sql: &str, params: &[&dyn ToSql]) -> Result<T> {
        let mut value = None;
        self.query_first(sql, params, &mut |row| {
            value = Some(row.get(0)?);
            Ok(())
        })?;
        value.ok_or_else(|| rusqlite::Error::QueryReturnedNoRows.into())
    }
}

impl<Q: Querier> QuerierExt for Q {}
