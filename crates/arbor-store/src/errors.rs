//! Error handling for arbor-store
//!
//! Store failures surface as `ArborError::Persistence` so they flow through
//! the engine's `Result` unchanged.

use arbor_core::errors::ArborError;

/// Result type alias shared with the engine
pub type Result<T> = std::result::Result<T, ArborError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ArborError {
    ArborError::Persistence {
        op: "sqlite".to_string(),
        message: err.to_string(),
    }
}

/// Database error tagged with the store operation that hit it
pub fn persistence(op: &str, err: rusqlite::Error) -> ArborError {
    ArborError::Persistence {
        op: op.to_string(),
        message: err.to_string(),
    }
}

/// Stored value that does not fit the row model
pub fn corrupt_value(column: &str, value: i64) -> ArborError {
    ArborError::CorruptClosure {
        reason: format!("column {} holds out-of-range value {}", column, value),
    }
}
