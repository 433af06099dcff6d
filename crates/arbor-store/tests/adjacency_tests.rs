//! Rebuilding from the host's parent-pointer table

mod common;

use arbor_core::{AdjacencyEntry, ArborConfig, ArborError, ClosureTable, RowStore};
use arbor_store::adjacency::{load_adjacency, rebuild_from_host};
use arbor_store::{db, schema, SqliteRowStore};
use common::{create_host_nodes, id, ids, row_count, setup_store, sqlite_fixture};

#[test]
fn test_load_adjacency_orders_by_primary_key() {
    let store = setup_store(&ArborConfig::default());
    create_host_nodes(store.connection());

    let entries = load_adjacency(store.connection(), &ArborConfig::default()).unwrap();
    assert_eq!(entries.len(), 18);
    assert_eq!(entries[0], AdjacencyEntry::root(id(1)));
    assert_eq!(entries[9], AdjacencyEntry::child(id(10), id(9)));
    assert_eq!(entries[17], AdjacencyEntry::root(id(18)));
}

#[test]
fn test_rebuild_from_host_matches_incremental_build() {
    let config = ArborConfig::default();
    let store = setup_store(&config);
    create_host_nodes(store.connection());
    let mut table = ClosureTable::new(store);

    let inserted = rebuild_from_host(&mut table, &config).unwrap();

    assert_eq!(inserted, 86);
    assert_eq!(
        table.store().all_rows().unwrap(),
        sqlite_fixture().store().all_rows().unwrap()
    );
}

#[test]
fn test_custom_table_and_column_names() {
    let config = ArborConfig::from_toml_str(
        r#"
closure_table = "category_tree"
node_table = "categories"
primary_key = "category_id"
parent_field = "parent_category"
insert_chunk_size = 5
"#,
    )
    .unwrap();

    let conn = db::open_in_memory().unwrap();
    schema::create_closure_table(&conn, &config).unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (category_id INTEGER PRIMARY KEY, parent_category INTEGER NULL);
         INSERT INTO categories VALUES (10, NULL), (11, 10), (12, 10), (13, 12);",
    )
    .unwrap();

    let mut table = ClosureTable::new(SqliteRowStore::new(conn, &config).unwrap());
    rebuild_from_host(&mut table, &config).unwrap();

    assert_eq!(table.store().table(), "category_tree");
    assert_eq!(table.descendants(id(10), false).unwrap(), ids(&[11, 12, 13]));
    assert_eq!(table.ancestors(id(13), false).unwrap(), ids(&[10, 12]));
    assert_eq!(row_count(&table), 4 * 2 + 4);
}

#[test]
fn test_missing_host_table_is_persistence_error() {
    let store = setup_store(&ArborConfig::default());
    let err = load_adjacency(store.connection(), &ArborConfig::default()).unwrap_err();
    assert!(matches!(err, ArborError::Persistence { ref op, .. } if op == "load_adjacency"));
}

#[test]
fn test_file_backed_database_persists_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forest.db");
    let config = ArborConfig::default();

    {
        let conn = db::open(&path).unwrap();
        db::configure(&conn).unwrap();
        schema::create_closure_table(&conn, &config).unwrap();
        let mut table = ClosureTable::new(SqliteRowStore::new(conn, &config).unwrap());
        table.on_node_created(id(1), None).unwrap();
        table.on_node_created(id(2), Some(id(1))).unwrap();
        table.on_node_created(id(3), Some(id(1))).unwrap();
        table
            .move_node(id(3), arbor_core::Destination::Top)
            .unwrap();
    }

    let conn = db::open(&path).unwrap();
    let table = ClosureTable::new(SqliteRowStore::new(conn, &config).unwrap());
    assert_eq!(table.children(id(1)).unwrap(), ids(&[3, 2]));
    assert!(table.verify().unwrap().is_empty());
}
