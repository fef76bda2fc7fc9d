//! Schema introspection and table lookup against in-memory SQLite.

use rusqlite::{Connection, Row, ToSql};
use sift::schema::normalize::normalize_type;
use sift::schema::{Column, ColumnType, Literal, MissingTables, NameCase};
use sift::{Error, IntrospectConfig, Querier, QuerierExt, introspect, orm};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

const EXAMPLE: &str = "
create table t (
    id int64 not null unique,
    uid uuid not null,
    n1 int default 42,
    n2 int default null,
    n3 int,
    nn1 int not null default 42,
    nn2 int not null default null,
    s1 text default '42',
    s2 text default 'null',
    s3 text default null,
    s7 text not null default null,
    s8 text not null,
    f1 timestamp default current_timestamp
);
";

fn example() -> Connection {
    init_tracing();
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(EXAMPLE).unwrap();
    conn
}

fn column<'a>(db: &'a sift::schema::Database, table: &str, name: &str) -> &'a Column {
    db.table(table)
        .and_then(|t| t.find_column(name))
        .unwrap_or_else(|| panic!("column {table}.{name} not found"))
}

#[test]
fn scans_example_table() {
    let conn = example();
    let db = introspect::scan(&conn).unwrap();

    assert_eq!(db.tables.len(), 1);
    let t = &db.tables[0];
    assert_eq!(t.name, "t");
    assert_eq!(t.columns.len(), 13);
    assert!(t.pk.is_empty());
    assert!(!t.without_rowid);
    assert!(!t.strict);

    let id = column(&db, "t", "id");
    assert_eq!(id.column_type, ColumnType::Int64);
    assert!(!id.nullable);
    assert_eq!(id.default, None);

    assert_eq!(column(&db, "t", "uid").column_type, ColumnType::Uuid);
    assert_eq!(column(&db, "t", "f1").column_type, ColumnType::Timestamp);

    let n1 = column(&db, "t", "n1");
    assert_eq!(normalize_type(&n1.column_type), ColumnType::Int);
    assert!(n1.nullable);
    assert_eq!(n1.default, Some(Literal::Int(42)));

    assert_eq!(column(&db, "t", "n2").default, Some(Literal::Null));
    assert_eq!(column(&db, "t", "n3").default, None);

    let nn1 = column(&db, "t", "nn1");
    assert!(!nn1.nullable);
    assert_eq!(nn1.default, Some(Literal::Int(42)));

    let nn2 = column(&db, "t", "nn2");
    assert!(!nn2.nullable);
    assert_eq!(nn2.default, Some(Literal::Null));

    assert_eq!(
        column(&db, "t", "s1").default,
        Some(Literal::Raw("\"42\"".to_string()))
    );
    assert_eq!(
        column(&db, "t", "s2").default,
        Some(Literal::Raw("\"null\"".to_string()))
    );
    assert_eq!(column(&db, "t", "s3").default, Some(Literal::Null));
    assert_eq!(column(&db, "t", "s8").default, None);
    assert_eq!(
        column(&db, "t", "f1").default,
        Some(Literal::CurrentTimestamp)
    );

    // the unique constraint shows up as an automatic index
    assert_eq!(t.indices.len(), 1);
    let auto = &t.indices[0];
    assert_eq!(auto.name, "sqlite_autoindex_t_1");
    assert!(auto.unique);
    assert_eq!(auto.columns, ["id"]);
}

#[test]
fn scan_keeps_column_order() {
    let conn = example();
    let db = introspect::scan(&conn).unwrap();
    let names: Vec<&str> = db.tables[0]
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "id", "uid", "n1", "n2", "n3", "nn1", "nn2", "s1", "s2", "s3", "s7", "s8", "f1"
        ]
    );
}

#[test]
fn normalized_defaults_drop_nullable_null() {
    let conn = example();
    let config = IntrospectConfig {
        normalize_types: true,
        normalize_defaults: true,
        ..Default::default()
    };
    let db = introspect::scan_with(&conn, &config).unwrap();

    assert_eq!(column(&db, "t", "n1").column_type, ColumnType::Int);
    assert_eq!(column(&db, "t", "s3").column_type, ColumnType::Text);
    assert_eq!(column(&db, "t", "n2").default, None);
    assert_eq!(column(&db, "t", "s3").default, None);
    // not null columns keep an explicit null default
    assert_eq!(column(&db, "t", "s7").default, Some(Literal::Null));
    assert_eq!(column(&db, "t", "nn2").default, Some(Literal::Null));
}

#[test]
fn scans_primary_key_and_table_options() {
    init_tracing();
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "
        create table k (a int, b text, c int, primary key (c, a)) without rowid, strict;
        create index k_b on k(b);
        create unique index k_ba on k(b, a);
        create view v as select a from k;
        ",
    )
    .unwrap();

    let db = introspect::scan(&conn).unwrap();
    assert_eq!(db.tables.len(), 1, "views are not tables");

    let k = db.table("k").unwrap();
    assert_eq!(k.pk, ["c", "a"]);
    assert!(k.without_rowid);
    assert!(k.strict);

    let k_b = k.find_index("k_b").unwrap();
    assert!(!k_b.unique);
    assert_eq!(k_b.columns, ["b"]);

    let k_ba = k.find_index("k_ba").unwrap();
    assert!(k_ba.unique);
    assert_eq!(k_ba.columns, ["b", "a"]);

    let pk_index = k.find_index("sqlite_autoindex_k_1").unwrap();
    assert!(pk_index.unique);
    assert_eq!(pk_index.columns, ["c", "a"]);
}

#[test]
fn scan_with_folds_and_sorts() {
    init_tracing();
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "
        create table Zeta (B int, A int);
        create table alpha (X text);
        ",
    )
    .unwrap();

    let config = IntrospectConfig {
        name_case: Some(NameCase::Lower),
        sort: true,
        ..Default::default()
    };
    let db = introspect::scan_with(&conn, &config).unwrap();
    let tables: Vec<&str> = db.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tables, ["alpha", "zeta"]);
    let zeta: Vec<&str> = db.tables[1]
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(zeta, ["a", "b"]);
}

#[test]
fn scanned_schema_checks_against_declared_columns() {
    let conn = example();
    let db = introspect::scan(&conn).unwrap();
    let t = db.table("t").unwrap();

    let required = [
        Column::new("id", ColumnType::Int64),
        Column::new("n1", "int").nullable(),
    ];
    assert!(t.check_columns(&required).is_ok());

    let err = t
        .check_columns(&[
            Column::new("zz", ColumnType::Int),
            Column::new("s8", ColumnType::Text).nullable(),
            Column::new("id", ColumnType::Int64),
        ])
        .unwrap_err();
    assert_eq!(err.missing.names(), ["zz"]);
    assert_eq!(err.incompatible.names(), ["s8"]);
}

#[test]
fn traced_connection_scans_the_same() {
    let conn = example();
    let plain = introspect::scan(&conn).unwrap();
    let traced_conn = conn.traced();
    assert!(std::ptr::eq(traced_conn.inner(), &conn));
    let traced = introspect::scan(&traced_conn).unwrap();
    assert_eq!(plain, traced);
}

#[test]
fn scan_inside_transaction() {
    let mut conn = example();
    let tx = conn.transaction().unwrap();
    tx.execute_batch("create table extra (x int)").unwrap();
    let db = introspect::scan(&tx).unwrap();
    assert!(db.has_table("extra"));
    drop(tx);

    let db = introspect::scan(&conn).unwrap();
    assert!(!db.has_table("extra"), "rolled back with the transaction");
}

#[test]
fn detects_empty_database() {
    init_tracing();
    let conn = Connection::open_in_memory().unwrap();
    assert!(introspect::is_empty(&conn).unwrap());
    assert!(introspect::scan(&conn).unwrap().tables.is_empty());

    conn.execute_batch("create table x (a int)").unwrap();
    assert!(!introspect::is_empty(&conn).unwrap());
}

#[test]
fn get_table_reports_columns() {
    let conn = example();
    let t = orm::get_table(&conn, "t").unwrap();
    assert_eq!(t.name, "t");
    assert_eq!(t.columns.len(), 13);
    assert!(t.has_column("nn2"));
    assert!(!t.has_column("NN2"));
}

#[test]
fn get_table_missing_table() {
    let conn = example();
    let err = orm::get_table(&conn, "nope").unwrap_err();
    assert!(
        matches!(&err, Error::TableDoesNotExist { table } if table == "nope"),
        "{err:?}"
    );
    assert_eq!(err.to_string(), "table nope does not exist");
}

/// Forwards to a connection, replacing statements that start with a prefix.
struct Rewrite<'a> {
    conn: &'a Connection,
    rules: &'a [(&'a str, &'a str)],
}

impl Querier for Rewrite<'_> {
    fn query(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
        on_row: &mut dyn FnMut(&Row<'_>) -> sift::Result<()>,
    ) -> sift::Result<()> {
        let mut sql = sql;
        for &(prefix, replacement) in self.rules {
            if sql.starts_with(prefix) {
                sql = replacement;
            }
        }
        self.conn.query(sql, params, on_row)
    }
}

const NO_COLUMNS: (&str, &str) = ("pragma table_info", "select 0, '', '', 0, null, 0 where 0");

#[test]
fn get_table_existing_without_columns() {
    let conn = example();
    let src = Rewrite {
        conn: &conn,
        rules: &[NO_COLUMNS],
    };

    let err = orm::get_table(&src, "t").unwrap_err();
    assert!(
        matches!(&err, Error::EmptyTableSchema { table } if table == "t"),
        "{err:?}"
    );
    assert_eq!(err.to_string(), "table t has an empty schema");

    let err = orm::get_table(&src, "nope").unwrap_err();
    assert!(
        matches!(&err, Error::TableDoesNotExist { table } if table == "nope"),
        "{err:?}"
    );
}

#[test]
fn get_table_existence_check_failure_names_the_table() {
    let conn = example();
    let src = Rewrite {
        conn: &conn,
        rules: &[NO_COLUMNS, ("select exists", "select no_such_function()")],
    };

    let err = orm::get_table(&src, "t").unwrap_err();
    match &err {
        Error::InTable { table, source } => {
            assert_eq!(table, "t");
            assert!(matches!(**source, Error::Sqlite(_)), "{source:?}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn get_tables_with_optional_names() {
    init_tracing();
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("create table a (x int, y text);")
        .unwrap();

    let tables = orm::get_tables(&conn, ["a", "?b"]).unwrap().unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables["a"].columns.iter().collect::<Vec<_>>(), ["x", "y"]);

    let err = orm::get_tables(&conn, ["a", "b", "", "c"]).unwrap_err();
    match err {
        Error::MissingTables(MissingTables(names)) => assert_eq!(names, ["b", "c"]),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(orm::get_tables(&conn, ["?b"]).unwrap().is_none());
    let nothing: Vec<String> = Vec::new();
    assert!(orm::get_tables(&conn, nothing).unwrap().is_none());
}

#[test]
fn get_tables_keeps_request_order() {
    init_tracing();
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("create table a (x int); create table b (y int);")
        .unwrap();

    let tables = orm::get_tables(&conn, ["b", "?a", "b"]).unwrap().unwrap();
    let names: Vec<&str> = tables.keys().map(String::as_str).collect();
    assert_eq!(names, ["b", "a"]);
}

#[test]
fn config_deserializes_with_defaults() {
    let config: IntrospectConfig =
        serde_json::from_str(r#"{ "normalize_types": true, "name_case": "upper" }"#).unwrap();
    assert_eq!(
        config,
        IntrospectConfig {
            normalize_types: true,
            name_case: Some(NameCase::Upper),
            ..Default::default()
        }
    );

    let empty: IntrospectConfig = serde_json::from_str("{}").unwrap();
    assert!(empty.normalization().is_noop());
}
