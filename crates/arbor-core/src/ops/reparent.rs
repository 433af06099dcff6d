//! Moving a subtree under a new parent
//!
//! The subtree's internal rows (ancestor inside the subtree) are kept as
//! they are, which preserves its shape and the ranks inside it. Every row
//! linking the subtree to the outside, markers included, is deleted and
//! rebuilt against the new parent's chain.

use arbor_core_types::NodeId;

use crate::errors::{ArborError, Result};
use crate::model::ClosureEdge;
use crate::ops::edge_builder::next_rank;
use crate::rows::{AncestorFilter, EdgeFilter, OrderBy, OrderUpdate, RowStore};
use crate::traversal::{self, lineage, rank_of};

/// Make `new_parent` the parent of `node`, carrying its subtree along
///
/// `node` becomes the last child of `new_parent`, or the last root when
/// `new_parent` is `None`. The group it leaves is compacted so its ranks
/// stay dense. Naming the current parent is a no-op.
///
/// # Returns
///
/// Number of subtree members relinked (0 for a no-op).
///
/// # Errors
///
/// - `UnknownNode` if `node` has no rank row
/// - `CyclicParent` if `new_parent` is `node` or inside its subtree
/// - `InvalidParent` if `new_parent` has no self edge
pub fn reparent<S: RowStore>(
    store: &mut S,
    node: NodeId,
    new_parent: Option<NodeId>,
) -> Result<usize> {
    store.transaction(|tx| {
        let placement =
            traversal::rank_row(tx, node)?.ok_or(ArborError::UnknownNode { node_id: node })?;
        if placement.ancestor == new_parent {
            return Ok(0);
        }
        let old_rank = rank_of(&placement)?;

        let subtree = tx.select_rows(
            &EdgeFilter::all().ancestor(AncestorFilter::Is(node)),
            &[OrderBy::DepthAsc],
            None,
        )?;
        let members: Vec<NodeId> = subtree.iter().map(|row| row.descendant).collect();

        let chain = match new_parent {
            Some(parent_id) => {
                if members.contains(&parent_id) {
                    return Err(ArborError::CyclicParent {
                        node_id: node,
                        parent_id,
                    });
                }
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

        let detached = tx.delete_rows(
            &EdgeFilter::all()
                .descendants_in(members.clone())
                .ancestor(AncestorFilter::OutsideOf(members)),
        )?;
        tx.bulk_update(
            &EdgeFilter::children_of(placement.ancestor).order_between(Some(old_rank + 1), None),
            OrderUpdate::Shift(-1),
        )?;

        let rank = next_rank(tx, new_parent)?;
        let rows = relink_rows(node, &subtree, &chain, rank);
        tx.bulk_insert(&rows)?;

        tracing::debug!(
            node_id = node.get(),
            subtree_len = subtree.len(),
            detached,
            inserted = rows.len(),
            "relinked subtree"
        );
        Ok(subtree.len())
    })
}

/// External rows for every subtree member under `chain`
///
/// `subtree` holds the rows `(node, X, d)`, so `d` is each member's depth
/// relative to `node`.
fn relink_rows(
    node: NodeId,
    subtree: &[ClosureEdge],
    chain: &[NodeId],
    rank: u32,
) -> Vec<ClosureEdge> {
    let len = chain.len() as u32;
    let mut rows = Vec::with_capacity(subtree.len() * (chain.len() + 1));

    for member in subtree {
        let is_top = member.descendant == node;
        for (i, ancestor) in chain.iter().enumerate() {
            let distance = len - i as u32;
            rows.push(ClosureEdge::ancestor_edge(
                *ancestor,
                member.descendant,
                member.depth + distance,
                (is_top && distance == 1).then_some(rank),
            ));
        }
        rows.push(ClosureEdge::marker(
            member.descendant,
            member.depth + len + 1,
            (is_top && chain.is_empty()).then_some(rank),
        ));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: i64) -> NodeId {
        NodeId::new(raw)
    }

    #[test]
    fn test_relink_under_chain() {
        let subtree = vec![
            ClosureEdge::self_edge(id(6)),
            ClosureEdge::ancestor_edge(id(6), id(11), 1, Some(1)),
        ];
        let rows = relink_rows(id(6), &subtree, &[id(1), id(4)], 1);
        assert_eq!(
            rows,
            vec![
                ClosureEdge::ancestor_edge(id(1), id(6), 2, None),
                ClosureEdge::ancestor_edge(id(4), id(6), 1, Some(1)),
                ClosureEdge::marker(id(6), 3, None),
                ClosureEdge::ancestor_edge(id(1), id(11), 3, None),
                ClosureEdge::ancestor_edge(id(4), id(11), 2, None),
                ClosureEdge::marker(id(11), 4, None),
            ]
        );
    }

    #[test]
    fn test_relink_to_top_level_ranks_marker() {
        let subtree = vec![ClosureEdge::self_edge(id(6))];
        let rows = relink_rows(id(6), &subtree, &[], 3);
        assert_eq!(rows, vec![ClosureEdge::marker(id(6), 1, Some(3))]);
    }
}
