//! Read-side queries over closure rows
//!
//! Every function takes the row store by shared reference and never writes.
//! List queries on a node with no closure rows return an empty list;
//! `depth` and `order` fail with `UnknownNode` instead.

pub mod children;
pub mod lineage;
pub mod position;
pub mod shape;
pub mod siblings;

use arbor_core_types::NodeId;

use crate::errors::{ArborError, Result};
use crate::model::{ClosureEdge, NodeQuery};
use crate::rows::{EdgeFilter, RowStore};

pub use children::{child, child_at, children, children_in_range, first_child, last_child};
pub use lineage::{ancestors, descendants};
pub use position::{depth, exists, has_children, has_parent, order};
pub use shape::{branch, branches, leaf, leaves};
pub use siblings::{sibling, siblings};

/// The depth-1 row carrying `node`'s sibling rank, if any
///
/// # Errors
///
/// Propagates row store failures.
pub fn rank_row<S: RowStore>(store: &S, node: NodeId) -> Result<Option<ClosureEdge>> {
    Ok(store
        .select_rows(&EdgeFilter::rank_row_of(node), &[], Some(1))?
        .into_iter()
        .next())
}

/// Rank stored on a rank row
pub(crate) fn rank_of(row: &ClosureEdge) -> Result<u32> {
    row.order.ok_or_else(|| ArborError::CorruptClosure {
        reason: format!("rank row of node {} has no order", row.descendant),
    })
}

/// Answer any query as a list; singular finders yield at most one id
///
/// # Errors
///
/// Returns `MissingTarget` for a child range with neither bound, and
/// propagates row store failures.
pub fn find<S: RowStore>(store: &S, query: &NodeQuery) -> Result<Vec<NodeId>> {
    match *query {
        NodeQuery::Ancestors { node, include_self } => ancestors(store, node, include_self),
        NodeQuery::Descendants { node, include_self } => descendants(store, node, include_self),
        NodeQuery::Children { node } => children(store, node),
        NodeQuery::ChildrenInRange { node, from, to } => children_in_range(store, node, from, to),
        NodeQuery::Child { node, pick } => Ok(child(store, node, pick)?.into_iter().collect()),
        NodeQuery::Branches { node, scope } => branches(store, node, scope),
        NodeQuery::Branch { node, pick } => Ok(branch(store, node, pick)?.into_iter().collect()),
        NodeQuery::Leaves { node, scope } => leaves(store, node, scope),
        NodeQuery::Leaf { node, pick } => Ok(leaf(store, node, pick)?.into_iter().collect()),
        NodeQuery::Siblings {
            node,
            direction,
            include_self,
        } => siblings(store, node, direction, include_self),
        NodeQuery::Sibling { node, pick } => Ok(sibling(store, node, pick)?.into_iter().collect()),
    }
}

/// Cardinality of [`find`]
///
/// # Errors
///
/// Same as [`find`].
pub fn count<S: RowStore>(store: &S, query: &NodeQuery) -> Result<usize> {
    Ok(find(store, query)?.len())
}

/// Whether [`count`] is non-zero
///
/// # Errors
///
/// Same as [`find`].
pub fn has<S: RowStore>(store: &S, query: &NodeQuery) -> Result<bool> {
    Ok(count(store, query)? > 0)
}
