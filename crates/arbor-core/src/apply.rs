//! Command dispatch
//!
//! ## Atomicity Contract
//!
//! Each command runs inside one row store transaction. Either all of its
//! row changes commit, or it returns an error and the closure table is
//! exactly as it was before the call.
//!
//! ## Example
//!
//! ```
//! use arbor_core::{apply::apply, ClosureTable, Command, MemoryRowStore};
//! use arbor_core_types::NodeId;
//!
//! let mut table = ClosureTable::new(MemoryRowStore::new());
//! apply(&mut table, Command::NodeCreated { node: NodeId::new(1), parent: None }).unwrap();
//! assert_eq!(table.depth(NodeId::new(1)).unwrap(), 0);
//! ```

use crate::commands::Command;
use crate::errors::Result;
use crate::rows::RowStore;
use crate::table::ClosureTable;

/// Apply one command to the closure table
///
/// # Errors
///
/// Returns the error of the underlying operation; see
/// [`ClosureTable::on_node_created`], [`ClosureTable::on_parent_changed`],
/// [`ClosureTable::move_node`] and [`ClosureTable::import_tree`].
pub fn apply<S: RowStore>(table: &mut ClosureTable<S>, cmd: Command) -> Result<()> {
    match cmd {
        Command::NodeCreated { node, parent } => table.on_node_created(node, parent),
        Command::ParentChanged { node, new_parent } => table.on_parent_changed(node, new_parent),
        Command::Move { node, destination } => table.move_node(node, destination).map(|_| ()),
        Command::ImportTree { adjacency } => table.import_tree(&adjacency).map(|_| ()),
    }
}
