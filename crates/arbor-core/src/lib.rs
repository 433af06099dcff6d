//! arbor core - closure-table forest engine
//!
//! Maintains an explicitly ordered forest as a closure table: one row per
//! ancestor/descendant pair, a depth marker per node, and dense sibling
//! ranks. This crate provides:
//! - the row store seam ([`RowStore`]) and an in-memory backend
//! - lifecycle callbacks for node creation and reparenting
//! - sibling reordering under every move destination
//! - full rebuild from, and export to, parent-pointer form
//! - the read-side query surface (ancestors, descendants, branches, leaves,
//!   siblings, positional lookups, counts)
//! - whole-table invariant checking
//!
//! ```
//! use arbor_core::{ClosureTable, Destination, MemoryRowStore};
//! use arbor_core_types::NodeId;
//!
//! let (root, a, b) = (NodeId::new(1), NodeId::new(2), NodeId::new(3));
//! let mut table = ClosureTable::new(MemoryRowStore::new());
//! table.on_node_created(root, None).unwrap();
//! table.on_node_created(a, Some(root)).unwrap();
//! table.on_node_created(b, Some(root)).unwrap();
//!
//! table.move_node(b, Destination::Top).unwrap();
//! assert_eq!(table.children(root).unwrap(), vec![b, a]);
//! ```

pub mod apply;
pub mod commands;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rows;
pub mod rules;
pub mod table;
pub mod traversal;

// Re-export commonly used types
pub use apply::apply;
pub use commands::Command;
pub use config::ArborConfig;
pub use errors::{ArborError, ExError, ExErrorKind, Result};
pub use model::{
    AdjacencyEntry, ChildPick, ClosureEdge, Destination, Direction, FindRequest, NodeQuery, Pick,
    Scope,
};
pub use rows::{MemoryRowStore, RowStore};
pub use table::ClosureTable;
