//! Full rebuild from, and export to, the adjacency form

use std::collections::{HashMap, HashSet};

use arbor_core_types::NodeId;

use crate::errors::{ArborError, Result};
use crate::model::{AdjacencyEntry, ClosureEdge};
use crate::ops::edge_builder::node_edges;
use crate::rows::{EdgeFilter, OrderBy, RowStore};

/// Replace every closure row with the rows describing `adjacency`
///
/// Siblings, roots included, are ranked in the order they appear in
/// `adjacency`. The whole list is validated before the table is touched.
///
/// # Returns
///
/// Number of rows inserted.
///
/// # Errors
///
/// See [`plan_rows`]; row store failures roll the rebuild back.
pub fn rebuild<S: RowStore>(store: &mut S, adjacency: &[AdjacencyEntry]) -> Result<usize> {
    let rows = plan_rows(adjacency)?;
    store.transaction(|tx| {
        let removed = tx.delete_rows(&EdgeFilter::all())?;
        tx.bulk_insert(&rows)?;
        tracing::debug!(removed, inserted = rows.len(), "rebuilt closure table");
        Ok(rows.len())
    })
}

/// Compute the closure rows for a whole forest
///
/// Depth-first per root; each node's rows are emitted as the node is
/// reached, with its chain of ancestors known at that point.
///
/// # Errors
///
/// - `NodeExists` if an id appears twice
/// - `InvalidParent` if a parent is not itself listed
/// - `CyclicParent` if a node cannot be reached from any root
pub fn plan_rows(adjacency: &[AdjacencyEntry]) -> Result<Vec<ClosureEdge>> {
    let mut known = HashSet::with_capacity(adjacency.len());
    for entry in adjacency {
        if !known.insert(entry.id) {
            return Err(ArborError::NodeExists { node_id: entry.id });
        }
    }

    let mut roots = Vec::new();
    let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for entry in adjacency {
        match entry.parent {
            None => roots.push(entry.id),
            Some(parent_id) if known.contains(&parent_id) => {
                children.entry(parent_id).or_default().push(entry.id)
            }
            Some(parent_id) => {
                return Err(ArborError::InvalidParent {
                    node_id: entry.id,
                    parent_id,
                })
            }
        }
    }

    let mut rows = Vec::new();
    let mut reached = 0usize;
    let mut stack: Vec<(NodeId, u32, Vec<NodeId>)> = roots
        .iter()
        .enumerate()
        .rev()
        .map(|(i, id)| (*id, i as u32 + 1, Vec::new()))
        .collect();

    while let Some((node, rank, chain)) = stack.pop() {
        reached += 1;
        rows.extend(node_edges(node, &chain, rank));

        if let Some(kids) = children.get(&node) {
            let mut below = chain;
            below.push(node);
            for (i, child) in kids.iter().enumerate().rev() {
                stack.push((*child, i as u32 + 1, below.clone()));
            }
        }
    }

    if reached < adjacency.len() {
        let reachable: HashSet<NodeId> = rows.iter().map(|row| row.descendant).collect();
        if let Some(entry) = adjacency.iter().find(|e| !reachable.contains(&e.id)) {
            return Err(ArborError::CyclicParent {
                node_id: entry.id,
                parent_id: entry.parent.unwrap_or(entry.id),
            });
        }
    }

    Ok(rows)
}

/// The forest as adjacency entries, each sibling group in rank order
///
/// Feeding the result to [`rebuild`] reproduces the same ranks.
///
/// # Errors
///
/// Propagates row store failures.
pub fn export_adjacency<S: RowStore>(store: &S) -> Result<Vec<AdjacencyEntry>> {
    let rows = store.select_rows(&EdgeFilter::all().depth(1), &[OrderBy::OrderAsc], None)?;
    Ok(rows
        .into_iter()
        .map(|row| AdjacencyEntry {
            id: row.descendant,
            parent: row.ancestor,
        })
        .collect())
}
