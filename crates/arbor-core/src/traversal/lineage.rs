//! Ancestor and descendant listings

use std::collections::HashMap;

use arbor_core_types::NodeId;

use crate::errors::{ArborError, Result};
use crate::rows::{AncestorFilter, EdgeFilter, OrderBy, RowStore};

/// Ancestors of `node`, farthest first
///
/// With `include_self` the node itself closes the list, so the result is
/// the root-to-node path.
///
/// # Errors
///
/// Propagates row store failures.
pub fn ancestors<S: RowStore>(store: &S, node: NodeId, include_self: bool) -> Result<Vec<NodeId>> {
    let filter = EdgeFilter::all()
        .descendant(node)
        .ancestor(AncestorFilter::NotNull)
        .min_depth(u32::from(!include_self));
    let rows = store.select_rows(&filter, &[OrderBy::DepthDesc], None)?;
    Ok(rows.into_iter().filter_map(|row| row.ancestor).collect())
}

/// Descendants of `node`
///
/// Ordered level by level: by depth below `node`, then by the descendant's
/// own rank, then by the ranks of its ancestors below `node`, shallowest
/// first. Only ranks feed the key, never identifiers.
///
/// # Errors
///
/// Returns `CorruptClosure` when a descendant's chain of rank rows does not
/// lead back to `node`, and propagates row store failures.
pub fn descendants<S: RowStore>(
    store: &S,
    node: NodeId,
    include_self: bool,
) -> Result<Vec<NodeId>> {
    let rows = store.select_rows(
        &EdgeFilter::all()
            .ancestor(AncestorFilter::Is(node))
            .min_depth(u32::from(!include_self)),
        &[OrderBy::DepthAsc],
        None,
    )?;

    let below: Vec<NodeId> = rows
        .iter()
        .filter(|row| row.depth > 0)
        .map(|row| row.descendant)
        .collect();
    if below.is_empty() {
        return Ok(rows.into_iter().map(|row| row.descendant).collect());
    }

    let mut placement: HashMap<NodeId, (NodeId, u32)> = HashMap::with_capacity(below.len());
    for row in store.select_rows(
        &EdgeFilter::all()
            .descendants_in(below)
            .ancestor(AncestorFilter::NotNull)
            .depth(1),
        &[],
        None,
    )? {
        if let (Some(parent), Some(rank)) = (row.ancestor, row.order) {
            placement.insert(row.descendant, (parent, rank));
        }
    }

    let mut keyed = Vec::with_capacity(rows.len());
    for row in rows {
        let path = rank_path(&placement, node, row.descendant, row.depth)?;
        keyed.push((row.depth, path, row.descendant));
    }
    keyed.sort_by(|(da, pa, a), (db, pb, b)| {
        da.cmp(db)
            .then_with(|| pa.last().cmp(&pb.last()))
            .then_with(|| pa.cmp(pb))
            .then_with(|| a.cmp(b))
    });

    Ok(keyed.into_iter().map(|(_, _, id)| id).collect())
}

/// Ranks from just below `top` down to `node`, shallowest first
fn rank_path(
    placement: &HashMap<NodeId, (NodeId, u32)>,
    top: NodeId,
    node: NodeId,
    depth: u32,
) -> Result<Vec<u32>> {
    let mut path = Vec::with_capacity(depth as usize);
    let mut current = node;
    for _ in 0..depth {
        let (parent, rank) =
            placement
                .get(&current)
                .copied()
                .ok_or_else(|| ArborError::CorruptClosure {
                    reason: format!("node {} has no rank row below {}", current, top),
                })?;
        path.push(rank);
        current = parent;
    }
    if current != top {
        return Err(ArborError::CorruptClosure {
            reason: format!("rank rows of node {} do not lead to {}", node, top),
        });
    }
    path.reverse();
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: i64) -> NodeId {
        NodeId::new(raw)
    }

    #[test]
    fn test_rank_path_walks_to_top() {
        let mut placement = HashMap::new();
        placement.insert(id(2), (id(1), 1));
        placement.insert(id(3), (id(2), 4));
        assert_eq!(rank_path(&placement, id(1), id(3), 2).unwrap(), vec![1, 4]);
        assert!(rank_path(&placement, id(1), id(1), 0).unwrap().is_empty());
    }

    #[test]
    fn test_rank_path_detects_broken_chain() {
        let mut placement = HashMap::new();
        placement.insert(id(3), (id(2), 1));
        let err = rank_path(&placement, id(1), id(3), 2).unwrap_err();
        assert!(matches!(err, ArborError::CorruptClosure { .. }));
    }
}
