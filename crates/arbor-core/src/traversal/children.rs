//! Direct children and positional child lookups

use arbor_core_types::NodeId;

use crate::errors::{ArborError, Result};
use crate::model::ChildPick;
use crate::rows::{EdgeFilter, OrderBy, RowStore};

/// Children of `node` in rank order
///
/// # Errors
///
/// Propagates row store failures.
pub fn children<S: RowStore>(store: &S, node: NodeId) -> Result<Vec<NodeId>> {
    ranked(store, EdgeFilter::children_of(Some(node)), OrderBy::OrderAsc, None)
}

/// Children of `node` ranked within `[from, to]`
///
/// # Errors
///
/// Returns `MissingTarget` when both bounds are absent.
pub fn children_in_range<S: RowStore>(
    store: &S,
    node: NodeId,
    from: Option<u32>,
    to: Option<u32>,
) -> Result<Vec<NodeId>> {
    if from.is_none() && to.is_none() {
        return Err(ArborError::MissingTarget {
            field: "from or to".to_string(),
        });
    }
    ranked(
        store,
        EdgeFilter::children_of(Some(node)).order_between(from, to),
        OrderBy::OrderAsc,
        None,
    )
}

/// Child holding rank `position`
///
/// # Errors
///
/// Propagates row store failures.
pub fn child_at<S: RowStore>(store: &S, node: NodeId, position: u32) -> Result<Option<NodeId>> {
    let filter = EdgeFilter::children_of(Some(node)).order_between(Some(position), Some(position));
    Ok(ranked(store, filter, OrderBy::OrderAsc, Some(1))?.pop())
}

/// # Errors
///
/// Propagates row store failures.
pub fn first_child<S: RowStore>(store: &S, node: NodeId) -> Result<Option<NodeId>> {
    Ok(ranked(store, EdgeFilter::children_of(Some(node)), OrderBy::OrderAsc, Some(1))?.pop())
}

/// # Errors
///
/// Propagates row store failures.
pub fn last_child<S: RowStore>(store: &S, node: NodeId) -> Result<Option<NodeId>> {
    Ok(ranked(store, EdgeFilter::children_of(Some(node)), OrderBy::OrderDesc, Some(1))?.pop())
}

/// # Errors
///
/// Propagates row store failures.
pub fn child<S: RowStore>(store: &S, node: NodeId, pick: ChildPick) -> Result<Option<NodeId>> {
    match pick {
        ChildPick::First => first_child(store, node),
        ChildPick::Last => last_child(store, node),
        ChildPick::At(position) => child_at(store, node, position),
    }
}

fn ranked<S: RowStore>(
    store: &S,
    filter: EdgeFilter,
    order_by: OrderBy,
    limit: Option<usize>,
) -> Result<Vec<NodeId>> {
    Ok(store
        .select_rows(&filter, &[order_by], limit)?
        .into_iter()
        .map(|row| row.descendant)
        .collect())
}
