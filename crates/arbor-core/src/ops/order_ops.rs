//! Reordering siblings
//!
//! A move touches one rank group only. Every destination reduces to a
//! target rank; the siblings between the old and target rank shift by one
//! toward the vacated slot in a single bulk update, then the moved node's
//! rank is set.

use arbor_core_types::NodeId;

use crate::errors::{ArborError, Result};
use crate::model::Destination;
use crate::rows::{EdgeFilter, OrderUpdate, RowStore};
use crate::traversal::{rank_of, rank_row};

/// Move `node` within its sibling group
///
/// Roots move within the root group.
///
/// # Returns
///
/// `true` if any rank changed, `false` for a no-op (already first for
/// `Up`, already last for `Down`, already adjacent for `Before`/`After`,
/// or relative to itself).
///
/// # Errors
///
/// - `UnknownNode` if `node`, or the sibling named by `Before`/`After`,
///   has no rank row
/// - `InvalidPosition` for `To(n)` outside `1..=siblings`, or a
///   `Before`/`After` sibling from another group
pub fn move_node<S: RowStore>(store: &mut S, node: NodeId, destination: Destination) -> Result<bool> {
    store.transaction(|tx| {
        let placement = rank_row(tx, node)?.ok_or(ArborError::UnknownNode { node_id: node })?;
        let current = rank_of(&placement)?;
        let group = EdgeFilter::children_of(placement.ancestor);
        let size = tx.select_rows(&group, &[], None)?.len() as u32;

        let target = match destination {
            Destination::Up => current.saturating_sub(1).max(1),
            Destination::Down => (current + 1).min(size),
            Destination::Top => 1,
            Destination::Bottom => size,
            Destination::To(position) => {
                if position == 0 || position > size {
                    return Err(ArborError::InvalidPosition {
                        node_id: node,
                        reason: format!("rank {} outside 1..={}", position, size),
                    });
                }
                position
            }
            Destination::Before(other) | Destination::After(other) if other == node => current,
            Destination::Before(other) => {
                let anchor = sibling_rank(tx, node, placement.ancestor, other)?;
                if current < anchor {
                    anchor - 1
                } else {
                    anchor
                }
            }
            Destination::After(other) => {
                let anchor = sibling_rank(tx, node, placement.ancestor, other)?;
                if current < anchor {
                    anchor
                } else {
                    anchor + 1
                }
            }
        };

        if target == current {
            return Ok(false);
        }

        let (from, to, delta) = if target < current {
            (target, current - 1, 1)
        } else {
            (current + 1, target, -1)
        };
        tx.bulk_update(
            &group.order_between(Some(from), Some(to)),
            OrderUpdate::Shift(delta),
        )?;
        tx.bulk_update(&EdgeFilter::rank_row_of(node), OrderUpdate::Set(target))?;

        tracing::debug!(node_id = node.get(), from = current, to = target, "moved node");
        Ok(true)
    })
}

/// Rank of `other`, which must share `parent` with `node`
fn sibling_rank<S: RowStore>(
    store: &S,
    node: NodeId,
    parent: Option<NodeId>,
    other: NodeId,
) -> Result<u32> {
    let row = rank_row(store, other)?.ok_or(ArborError::UnknownNode { node_id: other })?;
    if row.ancestor != parent {
        return Err(ArborError::InvalidPosition {
            node_id: node,
            reason: format!("{} is not a sibling", other),
        });
    }
    rank_of(&row)
}
