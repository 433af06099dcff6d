//! arbor store - SQLite backend for the closure-table engine
//!
//! Provides:
//! - connection helpers ([`db`])
//! - closure table DDL ([`schema`])
//! - [`SqliteRowStore`], the `RowStore` implementation over one connection
//! - a loader for the host's parent-pointer table ([`adjacency`])

pub mod adjacency;
pub mod db;
pub mod errors;
pub mod row_store;
pub mod schema;

// Re-export key types
pub use errors::Result;
pub use row_store::SqliteRowStore;
