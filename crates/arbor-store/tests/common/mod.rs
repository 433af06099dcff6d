use arbor_core::{ArborConfig, ClosureTable};
use arbor_core_types::NodeId;
use arbor_store::{db, schema, SqliteRowStore};
use rusqlite::Connection;

/// Node/parent pairs in creation order; same forest as the engine tests
#[allow(dead_code)]
pub const FIXTURE: [(i64, Option<i64>); 18] = [
    (1, None),
    (2, Some(1)),
    (3, Some(2)),
    (4, Some(1)),
    (5, Some(2)),
    (6, Some(2)),
    (7, Some(3)),
    (8, Some(3)),
    (9, Some(8)),
    (10, Some(9)),
    (11, Some(6)),
    (12, Some(3)),
    (13, Some(3)),
    (14, Some(8)),
    (15, Some(14)),
    (16, Some(8)),
    (17, Some(16)),
    (18, None),
];

#[allow(dead_code)]
pub fn id(raw: i64) -> NodeId {
    NodeId::new(raw)
}

#[allow(dead_code)]
pub fn ids(raw: &[i64]) -> Vec<NodeId> {
    raw.iter().copied().map(NodeId::new).collect()
}

/// In-memory database with the closure table created
#[allow(dead_code)]
pub fn setup_store(config: &ArborConfig) -> SqliteRowStore {
    let conn = db::open_in_memory().unwrap();
    db::configure(&conn).unwrap();
    schema::create_closure_table(&conn, config).unwrap();
    SqliteRowStore::new(conn, config).unwrap()
}

#[allow(dead_code)]
pub fn empty_table() -> ClosureTable<SqliteRowStore> {
    ClosureTable::new(setup_store(&ArborConfig::default()))
}

#[allow(dead_code)]
pub fn sqlite_fixture() -> ClosureTable<SqliteRowStore> {
    let mut table = empty_table();
    for (node, parent) in FIXTURE {
        table.on_node_created(id(node), parent.map(id)).unwrap();
    }
    table
}

/// Host table `nodes(id, parent_id, name)` holding the fixture
#[allow(dead_code)]
pub fn create_host_nodes(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE nodes (
            id INTEGER PRIMARY KEY,
            parent_id INTEGER NULL REFERENCES nodes(id),
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    for (node, parent) in FIXTURE {
        conn.execute(
            "INSERT INTO nodes (id, parent_id, name) VALUES (?1, ?2, ?3)",
            rusqlite::params![node, parent, format!("node {}", node)],
        )
        .unwrap();
    }
}

#[allow(dead_code)]
pub fn row_count(table: &ClosureTable<SqliteRowStore>) -> i64 {
    let store = table.store();
    store
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM \"{}\"", store.table()), [], |row| {
            row.get(0)
        })
        .unwrap()
}
