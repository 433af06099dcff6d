//! In-memory event capture for logging assertions
//!
//! [`init_test_capture`] installs a layer that keeps every event, with its
//! fields rendered to strings, in a shared buffer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use arbor_core_types::schema::{FIELD_COMPONENT, FIELD_EVENT, FIELD_NODE_ID, FIELD_OP};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn component(&self) -> Option<&str> {
        self.field(FIELD_COMPONENT)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    /// `start`, `end` or `end_error` for operation events
    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event() == Some(event)
    }
}

#[derive(Default)]
struct Fields(HashMap<String, String>);

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// Layer appending every event to a shared buffer
pub struct CaptureLayer {
    buffer: Buffer,
}

impl CaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let buffer = Buffer::default();
        (
            Self {
                buffer: Arc::clone(&buffer),
            },
            TestCapture { buffer },
        )
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: fields.0,
        };
        if let Ok(mut events) = self.buffer.lock() {
            events.push(captured);
        }
    }
}

/// Read handle over the capture buffer
#[derive(Clone)]
pub struct TestCapture {
    buffer: Buffer,
}

impl TestCapture {
    /// Snapshot of everything captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.buffer
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn events_for(&self, op: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op() == Some(op))
            .collect()
    }

    /// Events of `op` that carry `node_id`, in emission order
    pub fn events_for_node(&self, op: &str, node_id: i64) -> Vec<CapturedEvent> {
        let wanted = node_id.to_string();
        self.events_for(op)
            .into_iter()
            .filter(|e| e.field(FIELD_NODE_ID) == Some(wanted.as_str()))
            .collect()
    }

    /// # Panics
    ///
    /// Panics when no event of `op` has the given event name.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "no {} event for op {} among {} captured events",
            event,
            op,
            events.len()
        );
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.buffer.lock() {
            events.clear();
        }
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer globally on first call and return its handle
///
/// Every test in a binary shares the buffer; filter on an operation name or
/// node id that only your test uses.
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let (layer, capture) = CaptureLayer::new();
            tracing_subscriber::registry().with(layer).init();
            capture
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_accessors_read_schema_fields() {
        let mut fields = HashMap::new();
        fields.insert("op".to_string(), "move_node".to_string());
        fields.insert("event".to_string(), "start".to_string());
        fields.insert("node_id".to_string(), "8".to_string());
        let event = CapturedEvent {
            level: Level::INFO,
            target: "arbor_core::table".to_string(),
            fields,
        };

        assert_eq!(event.op(), Some("move_node"));
        assert_eq!(event.event(), Some("start"));
        assert_eq!(event.field("node_id"), Some("8"));
        assert_eq!(event.component(), None);
        assert!(event.is("move_node", "start"));
    }
}
