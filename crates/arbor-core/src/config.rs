//! Engine and adapter configuration
//!
//! Table and column names are injected here instead of being resolved from
//! a global registry. Values load from TOML with per-field defaults.
//!
//! ```
//! use arbor_core::config::ArborConfig;
//!
//! let config = ArborConfig::from_toml_str("closure_table = \"categories_closure\"").unwrap();
//! assert_eq!(config.closure_table, "categories_closure");
//! assert_eq!(config.insert_chunk_size, 1000);
//! ```

use serde::Deserialize;

use crate::errors::{ArborError, Result};

/// Default number of rows per multi-row insert statement
pub const DEFAULT_INSERT_CHUNK_SIZE: usize = 1000;

/// Upper bound keeping a chunk's four bound parameters per row inside
/// SQLite's host parameter limit
pub const MAX_INSERT_CHUNK_SIZE: usize = 8000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArborConfig {
    /// Closure table name
    pub closure_table: String,
    /// Host table holding node records
    pub node_table: String,
    /// Primary key column of the host table
    pub primary_key: String,
    /// Parent-pointer column of the host table
    pub parent_field: String,
    /// Rows per bulk insert statement
    pub insert_chunk_size: usize,
}

impl Default for ArborConfig {
    fn default() -> Self {
        Self {
            closure_table: "nodes_closure".to_string(),
            node_table: "nodes".to_string(),
            primary_key: "id".to_string(),
            parent_field: "parent_id".to_string(),
            insert_chunk_size: DEFAULT_INSERT_CHUNK_SIZE,
        }
    }
}

impl ArborConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns `Serialization` for malformed TOML or unknown keys, and
    /// `InvalidConfig` when a value fails [`ArborConfig::validate`].
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: ArborConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check identifiers and chunk size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("closure_table", &self.closure_table),
            ("node_table", &self.node_table),
            ("primary_key", &self.primary_key),
            ("parent_field", &self.parent_field),
        ] {
            if !is_identifier(value) {
                return Err(ArborError::InvalidConfig {
                    reason: format!("{} '{}' is not a plain SQL identifier", field, value),
                });
            }
        }

        if !(1..=MAX_INSERT_CHUNK_SIZE).contains(&self.insert_chunk_size) {
            return Err(ArborError::InvalidConfig {
                reason: format!(
                    "insert_chunk_size must be between 1 and {}, got {}",
                    MAX_INSERT_CHUNK_SIZE, self.insert_chunk_size
                ),
            });
        }

        Ok(())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ArborConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.parent_field, "parent_id");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ArborConfig::from_toml_str(
            r#"
            node_table = "categories"
            insert_chunk_size = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.node_table, "categories");
        assert_eq!(config.insert_chunk_size, 250);
        assert_eq!(config.closure_table, "nodes_closure");
    }

    #[test]
    fn test_rejects_injected_identifier() {
        let err = ArborConfig::from_toml_str(r#"closure_table = "x; DROP TABLE y""#).unwrap_err();
        assert!(matches!(err, ArborError::InvalidConfig { .. }));
    }

    #[test]
    fn test_rejects_zero_chunk_size() {
        let err = ArborConfig::from_toml_str("insert_chunk_size = 0").unwrap_err();
        assert!(matches!(err, ArborError::InvalidConfig { .. }));
    }

    #[test]
    fn test_rejects_unknown_key() {
        let err = ArborConfig::from_toml_str("table = \"x\"").unwrap_err();
        assert!(matches!(err, ArborError::Serialization { .. }));
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_identifier("_tree2"));
        assert!(!is_identifier("2tree"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }
}
