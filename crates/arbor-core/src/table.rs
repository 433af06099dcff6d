//! Engine facade
//!
//! [`ClosureTable`] owns the injected row store and is the one entry point a
//! host needs: lifecycle callbacks, moves, rebuilds and the query surface.
//! Mutating calls are bracketed by `start`/`end`/`end_error` log events.

use std::time::Instant;

use arbor_core_types::NodeId;

use crate::errors::Result;
use crate::model::{
    AdjacencyEntry, Destination, Direction, FindRequest, NodeQuery, Pick, Scope,
};
use crate::rows::RowStore;
use crate::rules::{self, InvariantViolation};
use crate::{log_op_end, log_op_error, log_op_start, ops, traversal};

pub struct ClosureTable<S> {
    store: S,
}

impl<S: RowStore> ClosureTable<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ===== Lifecycle callbacks =====

    /// Call after the host has persisted a new node
    ///
    /// # Errors
    ///
    /// `NodeExists` or `InvalidParent`; see [`ops::insert_node`].
    pub fn on_node_created(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<()> {
        let store = &mut self.store;
        instrumented("on_node_created", node, || {
            ops::insert_node(store, node, parent).map(|_| ())
        })
    }

    /// Call after the host has changed a node's parent pointer
    ///
    /// # Errors
    ///
    /// `UnknownNode`, `CyclicParent` or `InvalidParent`; see
    /// [`ops::reparent`].
    pub fn on_parent_changed(&mut self, node: NodeId, new_parent: Option<NodeId>) -> Result<()> {
        let store = &mut self.store;
        instrumented("on_parent_changed", node, || {
            ops::reparent(store, node, new_parent).map(|_| ())
        })
    }

    // ===== Ordering =====

    /// Reorder a node among its siblings; `Ok(false)` means nothing moved
    ///
    /// # Errors
    ///
    /// `UnknownNode` or `InvalidPosition`; see [`ops::move_node`].
    pub fn move_node(&mut self, node: NodeId, destination: Destination) -> Result<bool> {
        let store = &mut self.store;
        instrumented("move_node", node, || ops::move_node(store, node, destination))
    }

    // ===== Bulk =====

    /// Discard every row and rebuild from `adjacency`
    ///
    /// # Errors
    ///
    /// `NodeExists`, `InvalidParent` or `CyclicParent`; see [`ops::rebuild`].
    pub fn import_tree(&mut self, adjacency: &[AdjacencyEntry]) -> Result<usize> {
        let started = Instant::now();
        log_op_start!("import_tree", node_count = adjacency.len());
        let outcome = ops::rebuild(&mut self.store, adjacency);
        let duration_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(inserted) => {
                log_op_end!("import_tree", duration_ms = duration_ms, row_count = *inserted);
            }
            Err(err) => {
                log_op_error!("import_tree", err.clone(), duration_ms = duration_ms);
            }
        }
        outcome
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn export_adjacency(&self) -> Result<Vec<AdjacencyEntry>> {
        ops::export_adjacency(&self.store)
    }

    /// Invariant violations over the whole table; empty when consistent
    ///
    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn verify(&self) -> Result<Vec<InvariantViolation>> {
        Ok(rules::check(&self.store.all_rows()?))
    }

    // ===== Queries =====

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn ancestors(&self, node: NodeId, include_self: bool) -> Result<Vec<NodeId>> {
        traversal::ancestors(&self.store, node, include_self)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn descendants(&self, node: NodeId, include_self: bool) -> Result<Vec<NodeId>> {
        traversal::descendants(&self.store, node, include_self)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn children(&self, node: NodeId) -> Result<Vec<NodeId>> {
        traversal::children(&self.store, node)
    }

    /// # Errors
    ///
    /// `MissingTarget` when both bounds are absent.
    pub fn children_in_range(
        &self,
        node: NodeId,
        from: Option<u32>,
        to: Option<u32>,
    ) -> Result<Vec<NodeId>> {
        traversal::children_in_range(&self.store, node, from, to)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn child_at(&self, node: NodeId, position: u32) -> Result<Option<NodeId>> {
        traversal::child_at(&self.store, node, position)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn first_child(&self, node: NodeId) -> Result<Option<NodeId>> {
        traversal::first_child(&self.store, node)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn last_child(&self, node: NodeId) -> Result<Option<NodeId>> {
        traversal::last_child(&self.store, node)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn branches(&self, node: NodeId, scope: Scope) -> Result<Vec<NodeId>> {
        traversal::branches(&self.store, node, scope)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn branch(&self, node: NodeId, pick: Pick) -> Result<Option<NodeId>> {
        traversal::branch(&self.store, node, pick)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn leaves(&self, node: NodeId, scope: Scope) -> Result<Vec<NodeId>> {
        traversal::leaves(&self.store, node, scope)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn leaf(&self, node: NodeId, pick: Pick) -> Result<Option<NodeId>> {
        traversal::leaf(&self.store, node, pick)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn siblings(
        &self,
        node: NodeId,
        direction: Option<Direction>,
        include_self: bool,
    ) -> Result<Vec<NodeId>> {
        traversal::siblings(&self.store, node, direction, include_self)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn sibling(&self, node: NodeId, pick: Pick) -> Result<Option<NodeId>> {
        traversal::sibling(&self.store, node, pick)
    }

    /// # Errors
    ///
    /// `UnknownNode` when the node has no depth marker.
    pub fn depth(&self, node: NodeId) -> Result<u32> {
        traversal::depth(&self.store, node)
    }

    /// # Errors
    ///
    /// `UnknownNode` when the node has no rank row.
    pub fn order(&self, node: NodeId) -> Result<u32> {
        traversal::order(&self.store, node)
    }

    /// # Errors
    ///
    /// `UnknownNode` when the node has no depth marker.
    pub fn has_parent(&self, node: NodeId) -> Result<bool> {
        traversal::has_parent(&self.store, node)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn has_children(&self, node: NodeId) -> Result<bool> {
        traversal::has_children(&self.store, node)
    }

    /// # Errors
    ///
    /// See [`traversal::find`].
    pub fn find(&self, query: &NodeQuery) -> Result<Vec<NodeId>> {
        traversal::find(&self.store, query)
    }

    /// Validate a loosely-typed request, then run it
    ///
    /// # Errors
    ///
    /// `MissingTarget` or `InvalidVariant` from validation, then as
    /// [`traversal::find`].
    pub fn find_request(&self, request: FindRequest) -> Result<Vec<NodeId>> {
        self.find(&NodeQuery::try_from(request)?)
    }

    /// # Errors
    ///
    /// See [`traversal::find`].
    pub fn count(&self, query: &NodeQuery) -> Result<usize> {
        traversal::count(&self.store, query)
    }

    /// # Errors
    ///
    /// See [`traversal::find`].
    pub fn has(&self, query: &NodeQuery) -> Result<bool> {
        traversal::has(&self.store, query)
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn count_children(&self, node: NodeId) -> Result<usize> {
        self.count(&NodeQuery::Children { node })
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn count_branches(&self, node: NodeId, scope: Scope) -> Result<usize> {
        self.count(&NodeQuery::Branches { node, scope })
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn count_leaves(&self, node: NodeId, scope: Scope) -> Result<usize> {
        self.count(&NodeQuery::Leaves { node, scope })
    }

    /// # Errors
    ///
    /// Propagates row store failures.
    pub fn count_siblings(&self, node: NodeId, direction: Option<Direction>) -> Result<usize> {
        self.count(&NodeQuery::Siblings {
            node,
            direction,
            include_self: false,
        })
    }
}

/// Bracket a node operation with start and end (or end_error) events
fn instrumented<T>(op: &'static str, node: NodeId, work: impl FnOnce() -> Result<T>) -> Result<T> {
    let started = Instant::now();
    log_op_start!(op, node_id = node.get());
    let outcome = work();
    let duration_ms = started.elapsed().as_millis() as u64;
    match &outcome {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms, node_id = node.get());
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms, node_id = node.get());
        }
    }
    outcome
}
