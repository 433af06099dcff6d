//! Row store seam
//!
//! The engine reads and writes closure rows only through [`RowStore`]:
//! filtered reads, bulk inserts, bulk rank updates, deletes, and a
//! transaction scope. Backends decide how filters execute; they must agree
//! on the matching rules of [`EdgeFilter::matches`] and on the ordering of
//! [`sort_edges`].

pub mod memory;

use std::cmp::Ordering;

use arbor_core_types::NodeId;

use crate::errors::Result;
use crate::model::ClosureEdge;

pub use memory::MemoryRowStore;

/// Storage backend for closure rows
pub trait RowStore {
    /// Rows matching `filter`, sorted by `order_by` then by the fixed
    /// `(descendant, ancestor, depth)` tiebreak, truncated to `limit`
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backend read fails.
    fn select_rows(
        &self,
        filter: &EdgeFilter,
        order_by: &[OrderBy],
        limit: Option<usize>,
    ) -> Result<Vec<ClosureEdge>>;

    /// Insert rows, split into backend-sized chunks
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if any chunk fails; callers run inside
    /// [`RowStore::transaction`] so earlier chunks roll back with it.
    fn bulk_insert(&mut self, rows: &[ClosureEdge]) -> Result<()>;

    /// Apply `update` to the `order` of every matching row, returning the
    /// number of rows touched
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backend write fails, or `CorruptClosure`
    /// if a shift would push a rank below 1.
    fn bulk_update(&mut self, filter: &EdgeFilter, update: OrderUpdate) -> Result<usize>;

    /// Delete every matching row, returning the number removed
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backend write fails.
    fn delete_rows(&mut self, filter: &EdgeFilter) -> Result<usize>;

    /// Run `work` atomically: its writes commit if it returns `Ok` and are
    /// discarded if it returns `Err`
    ///
    /// # Errors
    ///
    /// Propagates the error from `work`, or `Persistence` if the backend
    /// cannot open or finish the transaction.
    fn transaction<T, F>(&mut self, work: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T>;

    /// Every row, in tiebreak order
    ///
    /// # Errors
    ///
    /// Same as [`RowStore::select_rows`].
    fn all_rows(&self) -> Result<Vec<ClosureEdge>> {
        self.select_rows(&EdgeFilter::all(), &[], None)
    }
}

/// Predicate on a row's ancestor column
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AncestorFilter {
    #[default]
    Any,
    /// Marker rows only
    Null,
    NotNull,
    Is(NodeId),
    In(Vec<NodeId>),
    /// Null ancestor, or one outside the set
    OutsideOf(Vec<NodeId>),
}

impl AncestorFilter {
    /// Rows grouped under `parent`, where `None` is the root group
    pub fn group(parent: Option<NodeId>) -> Self {
        match parent {
            Some(id) => AncestorFilter::Is(id),
            None => AncestorFilter::Null,
        }
    }

    fn matches(&self, ancestor: Option<NodeId>) -> bool {
        match self {
            AncestorFilter::Any => true,
            AncestorFilter::Null => ancestor.is_none(),
            AncestorFilter::NotNull => ancestor.is_some(),
            AncestorFilter::Is(id) => ancestor == Some(*id),
            AncestorFilter::In(ids) => ancestor.is_some_and(|a| ids.contains(&a)),
            AncestorFilter::OutsideOf(ids) => ancestor.map_or(true, |a| !ids.contains(&a)),
        }
    }
}

/// Predicate on a row's descendant column
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DescendantFilter {
    #[default]
    Any,
    Is(NodeId),
    In(Vec<NodeId>),
}

impl DescendantFilter {
    fn matches(&self, descendant: NodeId) -> bool {
        match self {
            DescendantFilter::Any => true,
            DescendantFilter::Is(id) => descendant == *id,
            DescendantFilter::In(ids) => ids.contains(&descendant),
        }
    }
}

/// Conjunction of row predicates
///
/// Order bounds are inclusive and never match a row whose `order` is null.
///
/// ```
/// use arbor_core::rows::EdgeFilter;
/// use arbor_core_types::NodeId;
///
/// // children of node 3 ranked 2 through 4
/// let filter = EdgeFilter::children_of(Some(NodeId::new(3))).order_between(Some(2), Some(4));
/// assert_eq!(filter.depth, Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EdgeFilter {
    pub ancestor: AncestorFilter,
    pub descendant: DescendantFilter,
    pub exclude_descendant: Option<NodeId>,
    pub depth: Option<u32>,
    pub min_depth: Option<u32>,
    pub order_from: Option<u32>,
    pub order_to: Option<u32>,
}

impl EdgeFilter {
    /// Matches every row
    pub fn all() -> Self {
        Self::default()
    }

    /// Rank rows of the sibling group under `parent` (`None` = roots)
    pub fn children_of(parent: Option<NodeId>) -> Self {
        Self::all().ancestor(AncestorFilter::group(parent)).depth(1)
    }

    /// The rank row of `node`
    pub fn rank_row_of(node: NodeId) -> Self {
        Self::all().descendant(node).depth(1)
    }

    pub fn ancestor(mut self, ancestor: AncestorFilter) -> Self {
        self.ancestor = ancestor;
        self
    }

    pub fn descendant(mut self, node: NodeId) -> Self {
        self.descendant = DescendantFilter::Is(node);
        self
    }

    pub fn descendants_in(mut self, nodes: Vec<NodeId>) -> Self {
        self.descendant = DescendantFilter::In(nodes);
        self
    }

    pub fn excluding(mut self, node: NodeId) -> Self {
        self.exclude_descendant = Some(node);
        self
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn min_depth(mut self, depth: u32) -> Self {
        self.min_depth = Some(depth);
        self
    }

    pub fn order_between(mut self, from: Option<u32>, to: Option<u32>) -> Self {
        self.order_from = from;
        self.order_to = to;
        self
    }

    /// Whether an in-memory row satisfies every predicate
    pub fn matches(&self, edge: &ClosureEdge) -> bool {
        if !self.ancestor.matches(edge.ancestor) || !self.descendant.matches(edge.descendant) {
            return false;
        }
        if self.exclude_descendant == Some(edge.descendant) {
            return false;
        }
        if self.depth.is_some_and(|d| edge.depth != d) {
            return false;
        }
        if self.min_depth.is_some_and(|d| edge.depth < d) {
            return false;
        }
        if self.order_from.is_some() || self.order_to.is_some() {
            let Some(order) = edge.order else {
                return false;
            };
            if self.order_from.is_some_and(|from| order < from) {
                return false;
            }
            if self.order_to.is_some_and(|to| order > to) {
                return false;
            }
        }
        true
    }
}

/// Sort key for [`RowStore::select_rows`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    DepthAsc,
    DepthDesc,
    OrderAsc,
    OrderDesc,
}

/// Write applied by [`RowStore::bulk_update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderUpdate {
    /// Add to the current rank; null ranks stay null
    Shift(i64),
    /// Overwrite the rank
    Set(u32),
}

/// Sort rows the way every backend must: requested keys first, nulls
/// before values in ascending order, then `(descendant, ancestor, depth)`
pub fn sort_edges(rows: &mut [ClosureEdge], order_by: &[OrderBy]) {
    rows.sort_by(|a, b| {
        order_by
            .iter()
            .map(|key| match key {
                OrderBy::DepthAsc => a.depth.cmp(&b.depth),
                OrderBy::DepthDesc => b.depth.cmp(&a.depth),
                OrderBy::OrderAsc => a.order.cmp(&b.order),
                OrderBy::OrderDesc => b.order.cmp(&a.order),
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.descendant.cmp(&b.descendant))
            .then_with(|| a.ancestor.cmp(&b.ancestor))
            .then_with(|| a.depth.cmp(&b.depth))
    });
}
