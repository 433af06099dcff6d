//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent across the engine and the
//! storage adapter.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Node an operation acts on
pub const FIELD_NODE_ID: &str = "node_id";

// Rows written by a bulk operation
pub const FIELD_ROW_COUNT: &str = "row_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
