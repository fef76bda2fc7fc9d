//! Table lookup, declarative row binding and query enumeration.

pub mod bind;
pub mod select;

pub use bind::{Bindings, Fields, Record, bind};
pub use select::{
    Condition, Enumerate, Limit, Options, OrderBy, Selector, Where, select, select_to_vec,
};

use crate::traced::{Querier, QuerierExt};
use crate::{Error, Result, quote_ident};
use indexmap::{IndexMap, IndexSet};
use sift_schema::{MissingTables, Table};
use std::collections::{BTreeSet, HashSet};

/// A table name with the set of its column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableColumns {
    pub name: String,
    pub columns: BTreeSet<String>,
}

impl TableColumns {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }
}

impl From<&Table> for TableColumns {
    fn from(table: &Table) -> Self {
        TableColumns::new(&table.name, table.columns.iter().map(|c| c.name.as_str()))
    }
}

/// Look up the columns of one table.
pub fn get_table<Q: Querier>(src: &Q, name: &str) -> Result<TableColumns> {
    let mut columns = BTreeSet::new();
    src.query(
        &format!("pragma table_info({})", quote_ident(name)),
        &[],
        &mut |row| {
            columns.insert(row.get::<_, String>(1)?);
            Ok(())
        },
    )
    .map_err(|e| e.in_table(name))?;

    if columns.is_empty() {
        let exists_sql = "select exists(select 1 from sqlite_master where type='table' and name=?)";
        let exists: bool = src
            .scalar(exists_sql, &[&name])
            .map_err(|e| e.in_table(name))?;
        let table = name.to_string();
        return Err(if exists {
            Error::EmptyTableSchema { table }
        } else {
            Error::TableDoesNotExist { table }
        });
    }
    Ok(TableColumns {
        name: name.to_string(),
        columns,
    })
}

/// Look up several tables at once.
///
/// A name prefixed with `?` is optional; empty names are skipped. Every
/// absent mandatory table is reported in one [`MissingTables`] error. Returns
/// `None` when none of the requested tables exists.
pub fn get_tables<Q, I, S>(src: &Q, names: I) -> Result<Option<IndexMap<String, TableColumns>>>
where
    Q: Querier,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut existing = HashSet::new();
    src.query(
        "select name from sqlite_master where type='table'",
        &[],
        &mut |row| {
            existing.insert(row.get::<_, String>(0)?);
            Ok(())
        },
    )?;

    let mut matching = IndexSet::new();
    let mut missing = Vec::new();
    for entry in names {
        let entry = entry.as_ref();
        let (name, optional) = match entry.strip_prefix('?') {
            Some(rest) => (rest, true),
            None => (entry, false),
        };
        if name.is_empty() {
            continue;
        }
        if existing.contains(name) {
            matching.insert(name.to_string());
        } else if !optional {
            missing.push(name.to_string());
        }
    }

    if !missing.is_empty() {
        return Err(MissingTables(missing).into());
    }
    if matching.is_empty() {
        return Ok(None);
    }

    let mut tables = IndexMap::with_capacity(matching.len());
    for name in matching {
        let table = get_table(src, &name)?;
        tables.insert(name, table);
    }
    Ok(Some(tables))
}
