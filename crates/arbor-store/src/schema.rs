//! Closure table DDL
//!
//! One table per configuration:
//!
//! | column | type | notes |
//! |---|---|---|
//! | `id` | integer | autoincrement surrogate key |
//! | `parent_id` | integer, nullable | ancestor; null on depth markers |
//! | `child_id` | integer | descendant |
//! | `depth` | integer | |
//! | `node_order` | integer, nullable | sibling rank on depth-1 rows only |

use arbor_core::ArborConfig;
use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};

/// Create the closure table and its indexes if missing
///
/// # Errors
///
/// Returns `InvalidConfig` for an invalid configuration, `Persistence` if
/// the DDL fails.
pub fn create_closure_table(conn: &Connection, config: &ArborConfig) -> Result<()> {
    config.validate()?;
    let table = &config.closure_table;
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS \"{table}\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            parent_id INTEGER NULL,
            child_id INTEGER NOT NULL,
            depth INTEGER NOT NULL,
            node_order INTEGER NULL
        );
        CREATE INDEX IF NOT EXISTS \"{table}_child_depth_idx\"
            ON \"{table}\" (child_id, depth);
        CREATE INDEX IF NOT EXISTS \"{table}_parent_depth_order_idx\"
            ON \"{table}\" (parent_id, depth, node_order);"
    ))
    .map_err(from_rusqlite)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_names(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = ?1 ORDER BY name")
            .unwrap();
        stmt.query_map([table], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_create_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        let config = ArborConfig::default();
        create_closure_table(&conn, &config).unwrap();
        create_closure_table(&conn, &config).unwrap();

        assert_eq!(
            index_names(&conn, "nodes_closure"),
            vec![
                "nodes_closure_child_depth_idx".to_string(),
                "nodes_closure_parent_depth_order_idx".to_string(),
            ]
        );
    }

    #[test]
    fn test_invalid_table_name_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let config = ArborConfig {
            closure_table: "bad name; DROP".to_string(),
            ..ArborConfig::default()
        };
        assert!(matches!(
            create_closure_table(&conn, &config),
            Err(arbor_core::ArborError::InvalidConfig { .. })
        ));
    }
}
