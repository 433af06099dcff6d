//! Closure rows for a newly created node

use arbor_core_types::NodeId;

use crate::errors::{ArborError, Result};
use crate::model::ClosureEdge;
use crate::rows::{EdgeFilter, OrderBy, RowStore};
use crate::traversal::{self, lineage};

/// Record a node the host has just created
///
/// Appends the node as the last child of `parent`, or as the last root when
/// `parent` is `None`. All rows land in one batch.
///
/// # Arguments
///
/// * `store` - Row store holding the closure table
/// * `node` - Identifier of the new node
/// * `parent` - Its parent, if any
///
/// # Returns
///
/// Number of rows inserted.
///
/// # Errors
///
/// - `NodeExists` if `node` already has a self edge
/// - `InvalidParent` if `parent` has no self edge
pub fn insert_node<S: RowStore>(
    store: &mut S,
    node: NodeId,
    parent: Option<NodeId>,
) -> Result<usize> {
    store.transaction(|tx| {
        if traversal::exists(tx, node)? {
            return Err(ArborError::NodeExists { node_id: node });
        }

        let chain = match parent {
            Some(parent_id) => {
                if !traversal::exists(tx, parent_id)? {
                    return Err(ArborError::InvalidParent {
                        node_id: node,
                        parent_id,
                    });
                }
                lineage::ancestors(tx, parent_id, true)?
            }
            None => Vec::new(),
        };

        let rank = next_rank(tx, parent)?;
        let rows = node_edges(node, &chain, rank);
        tx.bulk_insert(&rows)?;
        Ok(rows.len())
    })
}

/// Rank a new last member of `parent`'s group would take
pub(crate) fn next_rank<S: RowStore>(store: &S, parent: Option<NodeId>) -> Result<u32> {
    let last = store.select_rows(
        &EdgeFilter::children_of(parent),
        &[OrderBy::OrderDesc],
        Some(1),
    )?;
    Ok(last.first().and_then(|row| row.order).map_or(1, |rank| rank + 1))
}

/// Rows describing `node` placed under `chain` (root first, parent last)
/// with sibling rank `rank`
pub(crate) fn node_edges(node: NodeId, chain: &[NodeId], rank: u32) -> Vec<ClosureEdge> {
    let len = chain.len() as u32;
    let mut rows = Vec::with_capacity(chain.len() + 2);

    rows.push(ClosureEdge::marker(
        node,
        len + 1,
        chain.is_empty().then_some(rank),
    ));
    for (i, ancestor) in chain.iter().enumerate() {
        let depth = len - i as u32;
        rows.push(ClosureEdge::ancestor_edge(
            *ancestor,
            node,
            depth,
            (depth == 1).then_some(rank),
        ));
    }
    rows.push(ClosureEdge::self_edge(node));
    rows
}
