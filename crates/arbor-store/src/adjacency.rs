//! Reading the host's parent-pointer table
//!
//! The host keeps one row per node with a nullable parent column. Loading
//! it yields the adjacency form that `import_tree` rebuilds from, ranking
//! siblings by primary key.

use arbor_core::{AdjacencyEntry, ArborConfig, ClosureTable};
use arbor_core_types::NodeId;
use rusqlite::Connection;

use crate::errors::{persistence, Result};
use crate::row_store::SqliteRowStore;

/// `(primary_key, parent_field)` of every host row, by primary key
///
/// # Errors
///
/// Returns `InvalidConfig` for an invalid configuration and `Persistence`
/// if the host table cannot be read.
pub fn load_adjacency(conn: &Connection, config: &ArborConfig) -> Result<Vec<AdjacencyEntry>> {
    config.validate()?;
    let sql = format!(
        "SELECT \"{pk}\", \"{parent}\" FROM \"{table}\" ORDER BY \"{pk}\"",
        pk = config.primary_key,
        parent = config.parent_field,
        table = config.node_table,
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| persistence("load_adjacency", e))?;
    let entries = stmt
        .query_map([], |row| {
            Ok(AdjacencyEntry {
                id: NodeId::new(row.get(0)?),
                parent: row.get::<_, Option<i64>>(1)?.map(NodeId::new),
            })
        })
        .map_err(|e| persistence("load_adjacency", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| persistence("load_adjacency", e))?;

    tracing::debug!(
        table = %config.node_table,
        node_count = entries.len(),
        "loaded adjacency"
    );
    Ok(entries)
}

/// Rebuild the closure table from the host table on the same connection
///
/// # Errors
///
/// Same as [`load_adjacency`], then as `ClosureTable::import_tree`.
pub fn rebuild_from_host(
    table: &mut ClosureTable<SqliteRowStore>,
    config: &ArborConfig,
) -> Result<usize> {
    let adjacency = load_adjacency(table.store().connection(), config)?;
    table.import_tree(&adjacency)
}
