use arbor_core::{ClosureTable, MemoryRowStore, RowStore};
use arbor_core_types::NodeId;

/// Node/parent pairs in creation order
///
/// ```text
/// 1                      18
/// ├── 2
/// │   ├── 3
/// │   │   ├── 7
/// │   │   ├── 8
/// │   │   │   ├── 9 ── 10
/// │   │   │   ├── 14 ── 15
/// │   │   │   └── 16 ── 17
/// │   │   ├── 12
/// │   │   └── 13
/// │   ├── 5
/// │   └── 6 ── 11
/// └── 4
/// ```
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

/// Create the fixture forest node by node through the lifecycle callback
#[allow(dead_code)]
pub fn build_fixture<S: RowStore>(store: S) -> ClosureTable<S> {
    let mut table = ClosureTable::new(store);
    for (node, parent) in FIXTURE {
        table
            .on_node_created(id(node), parent.map(id))
            .expect("fixture node should insert");
    }
    table
}

#[allow(dead_code)]
pub fn fixture() -> ClosureTable<MemoryRowStore> {
    build_fixture(MemoryRowStore::new())
}

/// Ranks of the given nodes, in argument order
#[allow(dead_code)]
pub fn ranks<S: RowStore>(table: &ClosureTable<S>, nodes: &[i64]) -> Vec<u32> {
    nodes
        .iter()
        .map(|n| table.order(id(*n)).expect("node should have a rank"))
        .collect()
}

#[allow(dead_code)]
pub fn assert_consistent<S: RowStore>(table: &ClosureTable<S>) {
    let violations = table.verify().expect("rows should load");
    assert!(violations.is_empty(), "invariant violations: {:?}", violations);
}
