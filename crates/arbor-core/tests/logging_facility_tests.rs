#![allow(clippy::unwrap_used, clippy::expect_used)]

use arbor_core::errors::{ArborError, ExErrorKind};
use arbor_core::logging_facility::test_capture::init_test_capture;
use arbor_core::{log_op_end, log_op_error, log_op_start};
use arbor_core::{AdjacencyEntry, ClosureTable, Destination, MemoryRowStore};
use arbor_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND,
    FIELD_ROW_COUNT,
};
use arbor_core_types::NodeId;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
    let event = &capture.events_for(op_name)[0];
    assert!(event.component().is_some_and(|c| c.starts_with("logging_facility_tests")));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events = capture.events_for(op_name);
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].event(), Some(EVENT_END));
    assert_eq!(end_events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ArborError::UnknownNode {
        node_id: NodeId::new(9),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for(op_name)
        .into_iter()
        .filter(|e| e.event() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(error_events.len(), 1);

    let event = &error_events[0];
    assert_eq!(event.field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
    assert_eq!(
        event.field(FIELD_ERR_KIND),
        Some(format!("{:?}", ExErrorKind::NotFound).as_str())
    );
    assert_eq!(event.level, tracing::Level::ERROR);
}

#[test]
fn test_callbacks_emit_start_and_end() {
    let capture = init_test_capture();

    let mut table = ClosureTable::new(MemoryRowStore::new());
    table.on_node_created(NodeId::new(7101), None).unwrap();

    let events = capture.events_for_node("on_node_created", 7101);
    let kinds: Vec<_> = events.iter().filter_map(|e| e.event()).collect();
    assert_eq!(kinds, vec![EVENT_START, EVENT_END]);
    assert!(events[1].field(FIELD_DURATION_MS).is_some());
}

#[test]
fn test_failed_move_emits_end_error() {
    let capture = init_test_capture();

    let mut table = ClosureTable::new(MemoryRowStore::new());
    let err = table
        .move_node(NodeId::new(7201), Destination::Top)
        .unwrap_err();
    assert!(matches!(err, ArborError::UnknownNode { .. }));

    let failed: Vec<_> = capture
        .events_for_node("move_node", 7201)
        .into_iter()
        .filter(|e| e.event() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
}

#[test]
fn test_duplicate_node_logs_already_exists() {
    let capture = init_test_capture();
    let node = NodeId::new(7301);

    let mut table = ClosureTable::new(MemoryRowStore::new());
    table.on_node_created(node, None).unwrap();
    assert!(table.on_node_created(node, None).is_err());

    let codes: Vec<_> = capture
        .events_for_node("on_node_created", 7301)
        .iter()
        .filter(|e| e.event() == Some(EVENT_END_ERROR))
        .filter_map(|e| e.field(FIELD_ERR_CODE).map(str::to_string))
        .collect();
    assert_eq!(codes, vec!["ERR_ALREADY_EXISTS".to_string()]);
}

#[test]
fn test_import_logs_row_count() {
    let capture = init_test_capture();

    let mut table = ClosureTable::new(MemoryRowStore::new());
    table
        .import_tree(&[AdjacencyEntry::root(NodeId::new(7401))])
        .unwrap();

    capture.assert_event_exists("import_tree", EVENT_START);
    let ends = capture.count_events(|e| {
        e.op() == Some("import_tree")
            && e.event() == Some(EVENT_END)
            && e.field(FIELD_ROW_COUNT) == Some("2")
    });
    assert!(ends >= 1);
}
