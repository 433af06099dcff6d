//! Closure rows and the adjacency form they are rebuilt from

use arbor_core_types::NodeId;
use serde::{Deserialize, Serialize};

/// One materialized reachability pair
///
/// Three shapes exist for every node `N`:
/// - self edge `(N, N, 0, None)`
/// - ancestor edge `(A, N, k, order)` with `order` set only at `k == 1`
/// - depth marker `(None, N, depth(N) + 1, order)` with `order` set only for roots
///
/// A node's sibling rank therefore lives on its unique depth-1 row: the
/// parent edge for children, the marker for roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClosureEdge {
    pub ancestor: Option<NodeId>,
    pub descendant: NodeId,
    pub depth: u32,
    pub order: Option<u32>,
}

impl ClosureEdge {
    pub fn self_edge(node: NodeId) -> Self {
        Self {
            ancestor: Some(node),
            descendant: node,
            depth: 0,
            order: None,
        }
    }

    pub fn ancestor_edge(
        ancestor: NodeId,
        descendant: NodeId,
        depth: u32,
        order: Option<u32>,
    ) -> Self {
        Self {
            ancestor: Some(ancestor),
            descendant,
            depth,
            order,
        }
    }

    /// Depth-marker edge; `depth` is the node's absolute depth plus one
    pub fn marker(descendant: NodeId, depth: u32, order: Option<u32>) -> Self {
        Self {
            ancestor: None,
            descendant,
            depth,
            order,
        }
    }

    pub fn is_self_edge(&self) -> bool {
        self.depth == 0 && self.ancestor == Some(self.descendant)
    }

    pub fn is_marker(&self) -> bool {
        self.ancestor.is_none()
    }

    /// The row carrying the descendant's sibling rank
    pub fn is_rank_row(&self) -> bool {
        self.depth == 1
    }
}

/// A node and its parent pointer, as the host record store holds them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    pub id: NodeId,
    pub parent: Option<NodeId>,
}

impl AdjacencyEntry {
    pub fn root(id: NodeId) -> Self {
        Self { id, parent: None }
    }

    pub fn child(id: NodeId, parent: NodeId) -> Self {
        Self {
            id,
            parent: Some(parent),
        }
    }
}
