//! Depth, rank and presence checks

use arbor_core_types::NodeId;

use crate::errors::{ArborError, Result};
use crate::rows::{AncestorFilter, EdgeFilter, RowStore};
use crate::traversal::{children, rank_of, rank_row};

/// Whether `node` has a self edge
///
/// # Errors
///
/// Propagates row store failures.
pub fn exists<S: RowStore>(store: &S, node: NodeId) -> Result<bool> {
    let filter = EdgeFilter::all()
        .ancestor(AncestorFilter::Is(node))
        .descendant(node)
        .depth(0);
    Ok(!store.select_rows(&filter, &[], Some(1))?.is_empty())
}

/// Number of strict ancestors; roots are at depth 0
///
/// # Errors
///
/// Returns `UnknownNode` when `node` has no depth marker.
pub fn depth<S: RowStore>(store: &S, node: NodeId) -> Result<u32> {
    let filter = EdgeFilter::all()
        .ancestor(AncestorFilter::Null)
        .descendant(node);
    let marker = store
        .select_rows(&filter, &[], Some(1))?
        .into_iter()
        .next()
        .ok_or(ArborError::UnknownNode { node_id: node })?;
    marker
        .depth
        .checked_sub(1)
        .ok_or_else(|| ArborError::CorruptClosure {
            reason: format!("depth marker of node {} has depth 0", node),
        })
}

/// 1-based rank among siblings
///
/// # Errors
///
/// Returns `UnknownNode` when `node` has no rank row.
pub fn order<S: RowStore>(store: &S, node: NodeId) -> Result<u32> {
    let row = rank_row(store, node)?.ok_or(ArborError::UnknownNode { node_id: node })?;
    rank_of(&row)
}

/// # Errors
///
/// Returns `UnknownNode` when `node` has no depth marker.
pub fn has_parent<S: RowStore>(store: &S, node: NodeId) -> Result<bool> {
    Ok(depth(store, node)? > 0)
}

/// # Errors
///
/// Propagates row store failures.
pub fn has_children<S: RowStore>(store: &S, node: NodeId) -> Result<bool> {
    Ok(!children(store, node)?.is_empty())
}
