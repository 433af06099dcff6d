//! Sibling listings
//!
//! Siblings share a rank group: the same parent, or the root group for
//! top-level nodes.

use arbor_core_types::NodeId;

use crate::errors::Result;
use crate::model::{Direction, Pick};
use crate::rows::{EdgeFilter, OrderBy, RowStore};
use crate::traversal::{rank_of, rank_row};

/// Siblings of `node` in ascending rank, optionally only those ranked
/// before or after it
///
/// # Errors
///
/// Returns `CorruptClosure` if the node's rank row lacks an order, and
/// propagates row store failures.
pub fn siblings<S: RowStore>(
    store: &S,
    node: NodeId,
    direction: Option<Direction>,
    include_self: bool,
) -> Result<Vec<NodeId>> {
    let Some(row) = rank_row(store, node)? else {
        return Ok(Vec::new());
    };
    let rank = rank_of(&row)?;

    let group = EdgeFilter::children_of(row.ancestor);
    let filter = match direction {
        Some(Direction::Prev) => group.order_between(None, Some(rank.saturating_sub(1))),
        Some(Direction::Next) => group.order_between(Some(rank + 1), None),
        None if include_self => group,
        None => group.excluding(node),
    };

    Ok(store
        .select_rows(&filter, &[OrderBy::OrderAsc], None)?
        .into_iter()
        .map(|row| row.descendant)
        .collect())
}

/// First or last sibling other than `node`, or its nearest neighbour
///
/// # Errors
///
/// Same as [`siblings`].
pub fn sibling<S: RowStore>(store: &S, node: NodeId, pick: Pick) -> Result<Option<NodeId>> {
    Ok(match pick {
        Pick::First => siblings(store, node, None, false)?.first().copied(),
        Pick::Last => siblings(store, node, None, false)?.last().copied(),
        Pick::Prev => siblings(store, node, Some(Direction::Prev), false)?.last().copied(),
        Pick::Next => siblings(store, node, Some(Direction::Next), false)?.first().copied(),
    })
}
