//! Row-level behaviour of the SQLite backend
//!
//! Results must match the in-memory store for the same filters, including
//! the tiebreak order.

mod common;

use arbor_core::rows::{AncestorFilter, EdgeFilter, OrderBy, OrderUpdate};
use arbor_core::{ArborConfig, ArborError, ClosureEdge, MemoryRowStore, RowStore};
use common::{id, setup_store};

fn sample_rows() -> Vec<ClosureEdge> {
    vec![
        ClosureEdge::marker(id(1), 1, Some(1)),
        ClosureEdge::self_edge(id(1)),
        ClosureEdge::marker(id(2), 2, None),
        ClosureEdge::ancestor_edge(id(1), id(2), 1, Some(1)),
        ClosureEdge::self_edge(id(2)),
        ClosureEdge::marker(id(3), 2, None),
        ClosureEdge::ancestor_edge(id(1), id(3), 1, Some(2)),
        ClosureEdge::self_edge(id(3)),
        ClosureEdge::marker(id(4), 1, Some(2)),
        ClosureEdge::self_edge(id(4)),
    ]
}

fn stores() -> (arbor_store::SqliteRowStore, MemoryRowStore) {
    let mut sqlite = setup_store(&ArborConfig::default());
    let mut memory = MemoryRowStore::new();
    sqlite.bulk_insert(&sample_rows()).unwrap();
    memory.bulk_insert(&sample_rows()).unwrap();
    (sqlite, memory)
}

#[test]
fn test_select_matches_memory_store() {
    let (sqlite, memory) = stores();
    let cases = vec![
        (EdgeFilter::all(), vec![]),
        (EdgeFilter::children_of(Some(id(1))), vec![OrderBy::OrderDesc]),
        (EdgeFilter::children_of(None), vec![OrderBy::OrderAsc]),
        (
            EdgeFilter::all().ancestor(AncestorFilter::OutsideOf(vec![id(2), id(3)])),
            vec![OrderBy::DepthDesc],
        ),
        (
            EdgeFilter::all().ancestor(AncestorFilter::In(vec![id(1), id(4)])).depth(1),
            vec![],
        ),
        (
            EdgeFilter::all().descendants_in(vec![id(2), id(3)]).min_depth(1),
            vec![OrderBy::DepthAsc],
        ),
        (EdgeFilter::all().order_between(Some(2), None), vec![]),
        (
            EdgeFilter::children_of(Some(id(1))).excluding(id(2)),
            vec![OrderBy::OrderAsc],
        ),
        (EdgeFilter::all().ancestor(AncestorFilter::In(vec![])), vec![]),
        (EdgeFilter::all().ancestor(AncestorFilter::NotNull).depth(0), vec![]),
    ];

    for (filter, order_by) in cases {
        assert_eq!(
            sqlite.select_rows(&filter, &order_by, None).unwrap(),
            memory.select_rows(&filter, &order_by, None).unwrap(),
            "{:?} {:?}",
            filter,
            order_by
        );
    }
}

#[test]
fn test_nulls_sort_first_ascending() {
    let (sqlite, _) = stores();
    let rows = sqlite
        .select_rows(
            &EdgeFilter::all().descendant(id(2)),
            &[OrderBy::OrderAsc],
            None,
        )
        .unwrap();
    let orders: Vec<_> = rows.iter().map(|row| row.order).collect();
    assert_eq!(orders, vec![None, None, Some(1)]);
}

#[test]
fn test_limit() {
    let (sqlite, _) = stores();
    let rows = sqlite
        .select_rows(&EdgeFilter::all(), &[OrderBy::DepthDesc], Some(2))
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.depth == 2));
}

#[test]
fn test_shift_and_set() {
    let (mut sqlite, _) = stores();
    let touched = sqlite
        .bulk_update(&EdgeFilter::children_of(Some(id(1))), OrderUpdate::Shift(2))
        .unwrap();
    assert_eq!(touched, 2);

    sqlite
        .bulk_update(&EdgeFilter::rank_row_of(id(3)), OrderUpdate::Set(1))
        .unwrap();

    let ranks: Vec<_> = sqlite
        .select_rows(&EdgeFilter::children_of(Some(id(1))), &[OrderBy::OrderAsc], None)
        .unwrap()
        .into_iter()
        .map(|row| (row.descendant, row.order))
        .collect();
    assert_eq!(ranks, vec![(id(3), Some(1)), (id(2), Some(3))]);
}

#[test]
fn test_shift_below_one_is_rejected() {
    let (mut sqlite, _) = stores();
    let before = sqlite.all_rows().unwrap();

    let err = sqlite
        .bulk_update(&EdgeFilter::children_of(None), OrderUpdate::Shift(-1))
        .unwrap_err();

    assert!(matches!(err, ArborError::CorruptClosure { .. }));
    assert_eq!(sqlite.all_rows().unwrap(), before);
}

#[test]
fn test_delete_rows() {
    let (mut sqlite, _) = stores();
    let removed = sqlite
        .delete_rows(&EdgeFilter::all().descendant(id(3)))
        .unwrap();
    assert_eq!(removed, 3);
    assert_eq!(sqlite.all_rows().unwrap().len(), 7);
}

#[test]
fn test_inserts_split_into_chunks() {
    let config = ArborConfig {
        insert_chunk_size: 3,
        ..ArborConfig::default()
    };
    let mut sqlite = setup_store(&config);
    sqlite.bulk_insert(&sample_rows()).unwrap();

    let mut expected = sample_rows();
    arbor_core::rows::sort_edges(&mut expected, &[]);
    assert_eq!(sqlite.all_rows().unwrap(), expected);
}

#[test]
fn test_failed_transaction_rolls_back() {
    let (mut sqlite, _) = stores();
    let before = sqlite.all_rows().unwrap();

    let outcome: Result<(), ArborError> = sqlite.transaction(|tx| {
        tx.delete_rows(&EdgeFilter::all())?;
        tx.bulk_insert(&[ClosureEdge::self_edge(id(9))])?;
        Err(ArborError::Internal {
            message: "abort".to_string(),
        })
    });

    assert!(outcome.is_err());
    assert_eq!(sqlite.all_rows().unwrap(), before);
}

#[test]
fn test_nested_transaction_rolls_back_inner_only() {
    let (mut sqlite, _) = stores();

    sqlite
        .transaction(|tx| {
            tx.bulk_insert(&[ClosureEdge::self_edge(id(7))])?;
            let inner: Result<(), ArborError> = tx.transaction(|inner| {
                inner.bulk_insert(&[ClosureEdge::self_edge(id(8))])?;
                Err(ArborError::Internal {
                    message: "inner".to_string(),
                })
            });
            assert!(inner.is_err());
            Ok(())
        })
        .unwrap();

    let present = |node| {
        !sqlite
            .select_rows(&EdgeFilter::all().descendant(id(node)), &[], None)
            .unwrap()
            .is_empty()
    };
    assert!(present(7));
    assert!(!present(8));
}

#[test]
fn test_invalid_config_is_rejected() {
    let conn = arbor_store::db::open_in_memory().unwrap();
    let config = ArborConfig {
        insert_chunk_size: 0,
        ..ArborConfig::default()
    };
    assert!(matches!(
        arbor_store::SqliteRowStore::new(conn, &config),
        Err(ArborError::InvalidConfig { .. })
    ));
}
