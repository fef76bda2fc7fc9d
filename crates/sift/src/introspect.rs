//! Read the live schema of a SQLite database through its pragmas.

use crate::config::IntrospectConfig;
use crate::traced::{Querier, QuerierExt};
use crate::{Result, quote_ident};
use sift_schema::{Column, ColumnType, Database, Index, Literal, Table};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Read every user table of the `main` schema.
///
/// Views, virtual-table shadows outside `sqlite_master` and attached
/// databases are not reported. Tables come back in `pragma table_list` order.
pub fn scan<Q: Querier>(src: &Q) -> Result<Database> {
    let mut confirmed = HashSet::new();
    src.query(
        "select name from sqlite_master where type='table'",
        &[],
        &mut |row| {
            confirmed.insert(row.get::<_, String>(0)?);
            Ok(())
        },
    )?;

    let mut db = Database::default();
    src.query("pragma table_list", &[], &mut |row| {
        let name: String = row.get(1)?;
        let kind: String = row.get(2)?;
        if kind != "table" || !confirmed.contains(&name) {
            trace!(%name, %kind, "skipping catalog entry");
            return Ok(());
        }
        let wr: i64 = row.get(4)?;
        let strict: i64 = row.get(5)?;
        db.tables.push(Table {
            name,
            without_rowid: wr == 1,
            strict: strict == 1,
            ..Default::default()
        });
        Ok(())
    })?;

    for table in &mut db.tables {
        scan_table(src, table).map_err(|e| e.in_table(&table.name))?;
        debug!(
            table = %table.name,
            columns = table.columns.len(),
            indices = table.indices.len(),
            "scanned table"
        );
    }
    Ok(db)
}

/// [`scan`], then apply the normalization selected by `config`.
pub fn scan_with<Q: Querier>(src: &Q, config: &IntrospectConfig) -> Result<Database> {
    let mut db = scan(src)?;
    let normalization = config.normalization();
    if !normalization.is_noop() {
        normalization.apply(&mut db);
    }
    Ok(db)
}

/// True when the catalog holds no objects at all.
pub fn is_empty<Q: Querier>(src: &Q) -> Result<bool> {
    let count: i64 = src.scalar("select count(*) from sqlite_master", &[])?;
    Ok(count == 0)
}

fn scan_table<Q: Querier>(src: &Q, table: &mut Table) -> Result<()> {
    let mut pk: Vec<(i64, String)> = Vec::new();
    src.query(
        &format!("pragma table_info({})", quote_ident(&table.name)),
        &[],
        &mut |row| {
            let name: String = row.get(1)?;
            let declared: String = row.get(2)?;
            let notnull: i64 = row.get(3)?;
            let default: Option<String> = row.get(4)?;
            let pk_ordinal: i64 = row.get(5)?;
            if pk_ordinal > 0 {
                pk.push((pk_ordinal, name.clone()));
            }
            table.columns.push(Column {
                name,
                column_type: ColumnType::from_declared(&declared),
                nullable: notnull != 1,
                default: default.as_deref().map(Literal::parse),
                comment: None,
            });
            Ok(())
        },
    )?;
    pk.sort_by_key(|(ordinal, _)| *ordinal);
    table.pk = pk.into_iter().map(|(_, name)| name).collect();

    let mut indices = Vec::new();
    src.query(
        &format!("pragma index_list({})", quote_ident(&table.name)),
        &[],
        &mut |row| {
            let name: String = row.get(1)?;
            let unique: i64 = row.get(2)?;
            let mut columns = Vec::new();
            src.query(
                &format!("pragma index_info({})", quote_ident(&name)),
                &[],
                &mut |row| {
                    // expression columns have no name
                    if let Some(column) = row.get::<_, Option<String>>(2)? {
                        columns.push(column);
                    }
                    Ok(())
                },
            )?;
            indices.push(Index {
                name,
                unique: unique == 1,
                columns,
            });
            Ok(())
        },
    )?;
    table.indices = indices;
    Ok(())
}
