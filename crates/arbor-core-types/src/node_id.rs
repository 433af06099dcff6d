//! Node identity
//!
//! The host record store owns node identity. The closure table only ever
//! refers to nodes through this handle.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a node owned by the host record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(i64);

impl NodeId {
    /// Wrap a raw host key
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw host key
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for NodeId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<NodeId> for i64 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_round_trips_raw_key() {
        let id = NodeId::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(NodeId::from(42), id);
    }

    #[test]
    fn test_node_id_serializes_transparently() {
        let json = serde_json::to_string(&NodeId::new(7)).unwrap();
        assert_eq!(json, "7");

        let back: NodeId = serde_json::from_str("7").unwrap();
        assert_eq!(back, NodeId::new(7));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::new(-3).to_string(), "-3");
    }
}
