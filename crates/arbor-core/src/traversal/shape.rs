//! Branches and leaves
//!
//! A branch is a node with at least one child, a leaf one with none. Both
//! are selected from a candidate rank group: the children of a node, or the
//! siblings before, after, or around it.

use std::collections::HashSet;

use arbor_core_types::NodeId;

use crate::errors::Result;
use crate::model::{ClosureEdge, Pick, Scope};
use crate::rows::{AncestorFilter, EdgeFilter, OrderBy, RowStore};
use crate::traversal::{rank_of, rank_row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Branch,
    Leaf,
}

/// Branches in `scope` of `node`
///
/// `Scope::Prev` lists nearest first (descending rank); every other scope
/// ascends.
///
/// # Errors
///
/// Propagates row store failures.
pub fn branches<S: RowStore>(store: &S, node: NodeId, scope: Scope) -> Result<Vec<NodeId>> {
    select_shape(store, node, scope, Shape::Branch)
}

/// Leaves in `scope` of `node`, ordered like [`branches`]
///
/// # Errors
///
/// Propagates row store failures.
pub fn leaves<S: RowStore>(store: &S, node: NodeId, scope: Scope) -> Result<Vec<NodeId>> {
    select_shape(store, node, scope, Shape::Leaf)
}

/// First/last child branch of `node`, or its nearest sibling branch
///
/// # Errors
///
/// Propagates row store failures.
pub fn branch<S: RowStore>(store: &S, node: NodeId, pick: Pick) -> Result<Option<NodeId>> {
    pick_shape(store, node, pick, Shape::Branch)
}

/// First/last child leaf of `node`, or its nearest sibling leaf
///
/// # Errors
///
/// Propagates row store failures.
pub fn leaf<S: RowStore>(store: &S, node: NodeId, pick: Pick) -> Result<Option<NodeId>> {
    pick_shape(store, node, pick, Shape::Leaf)
}

fn pick_shape<S: RowStore>(
    store: &S,
    node: NodeId,
    pick: Pick,
    shape: Shape,
) -> Result<Option<NodeId>> {
    let found = match pick {
        Pick::First => select_shape(store, node, Scope::Children, shape)?.first().copied(),
        Pick::Last => select_shape(store, node, Scope::Children, shape)?.last().copied(),
        // prev scope is already nearest-first
        Pick::Prev => select_shape(store, node, Scope::Prev, shape)?.first().copied(),
        Pick::Next => select_shape(store, node, Scope::Next, shape)?.first().copied(),
    };
    Ok(found)
}

fn select_shape<S: RowStore>(
    store: &S,
    node: NodeId,
    scope: Scope,
    shape: Shape,
) -> Result<Vec<NodeId>> {
    let candidates = candidates(store, node, scope)?;
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<NodeId> = candidates.iter().map(|row| row.descendant).collect();
    let with_children: HashSet<NodeId> = store
        .select_rows(
            &EdgeFilter::all().ancestor(AncestorFilter::In(ids)).depth(1),
            &[],
            None,
        )?
        .into_iter()
        .filter_map(|row| row.ancestor)
        .collect();

    Ok(candidates
        .into_iter()
        .map(|row| row.descendant)
        .filter(|id| with_children.contains(id) == (shape == Shape::Branch))
        .collect())
}

fn candidates<S: RowStore>(store: &S, node: NodeId, scope: Scope) -> Result<Vec<ClosureEdge>> {
    let (filter, order_by) = match scope {
        Scope::Children => (EdgeFilter::children_of(Some(node)), OrderBy::OrderAsc),
        Scope::Prev | Scope::Next | Scope::Siblings => {
            let Some(row) = rank_row(store, node)? else {
                return Ok(Vec::new());
            };
            let rank = rank_of(&row)?;
            let group = EdgeFilter::children_of(row.ancestor);
            match scope {
                Scope::Prev => (
                    group.order_between(None, Some(rank.saturating_sub(1))),
                    OrderBy::OrderDesc,
                ),
                Scope::Next => (group.order_between(Some(rank + 1), None), OrderBy::OrderAsc),
                _ => (group.excluding(node), OrderBy::OrderAsc),
            }
        }
    };
    store.select_rows(&filter, &[order_by], None)
}
