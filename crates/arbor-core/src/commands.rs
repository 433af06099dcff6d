//! Command inventory
//!
//! The mutating surface of the engine as data, for hosts that queue or
//! replay structural changes. Processed by [`apply`](crate::apply::apply).

use arbor_core_types::NodeId;

use crate::model::{AdjacencyEntry, Destination};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The host created `node` under `parent`
    NodeCreated {
        node: NodeId,
        parent: Option<NodeId>,
    },

    /// The host changed `node`'s parent pointer
    ParentChanged {
        node: NodeId,
        new_parent: Option<NodeId>,
    },

    /// Reorder `node` among its siblings
    Move {
        node: NodeId,
        destination: Destination,
    },

    /// Rebuild everything from the adjacency form
    ImportTree { adjacency: Vec<AdjacencyEntry> },
}
