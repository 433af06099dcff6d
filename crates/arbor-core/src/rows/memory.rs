//! In-memory row store
//!
//! A `Vec` of rows with snapshot-and-restore transactions. Single-threaded;
//! used by tests and by hosts that keep the forest in process.

use crate::errors::{ArborError, Result};
use crate::model::ClosureEdge;
use crate::rows::{sort_edges, EdgeFilter, OrderBy, OrderUpdate, RowStore};

#[derive(Debug, Clone, Default)]
pub struct MemoryRowStore {
    rows: Vec<ClosureEdge>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowStore for MemoryRowStore {
    fn select_rows(
        &self,
        filter: &EdgeFilter,
        order_by: &[OrderBy],
        limit: Option<usize>,
    ) -> Result<Vec<ClosureEdge>> {
        let mut rows: Vec<ClosureEdge> = self
            .rows
            .iter()
            .filter(|row| filter.matches(row))
            .copied()
            .collect();
        sort_edges(&mut rows, order_by);
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn bulk_insert(&mut self, rows: &[ClosureEdge]) -> Result<()> {
        self.rows.extend_from_slice(rows);
        Ok(())
    }

    fn bulk_update(&mut self, filter: &EdgeFilter, update: OrderUpdate) -> Result<usize> {
        let mut touched = 0;
        for row in self.rows.iter_mut().filter(|row| filter.matches(row)) {
            row.order = match (update, row.order) {
                (OrderUpdate::Set(value), _) => Some(value),
                (OrderUpdate::Shift(_), None) => None,
                (OrderUpdate::Shift(delta), Some(current)) => {
                    let shifted = i64::from(current) + delta;
                    let shifted = u32::try_from(shifted)
                        .ok()
                        .filter(|rank| *rank >= 1)
                        .ok_or_else(|| ArborError::CorruptClosure {
                            reason: format!(
                                "rank of node {} would become {}",
                                row.descendant, shifted
                            ),
                        })?;
                    Some(shifted)
                }
            };
            touched += 1;
        }
        Ok(touched)
    }

    fn delete_rows(&mut self, filter: &EdgeFilter) -> Result<usize> {
        let before = self.rows.len();
        self.rows.retain(|row| !filter.matches(row));
        Ok(before - self.rows.len())
    }

    fn transaction<T, F>(&mut self, work: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let snapshot = self.rows.clone();
        let outcome = work(self);
        if outcome.is_err() {
            self.rows = snapshot;
        }
        outcome
    }
}
