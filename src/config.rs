//! Relationship inference settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Audit and bookkeeping columns present on nearly every table of a core-banking style schema.
pub const DEFAULT_EXCLUDED_COLUMNS: [&str; 16] = [
    "COMPANY",
    "TRAN_TIMESTAMP",
    "TRAN_TIME",
    "USER_ID",
    "OPERATOR_ID",
    "AUTH_USER_ID",
    "LAST_CHANGE_USER_ID",
    "CREATE_DATE",
    "CREATE_TIME",
    "UPDATE_DATE",
    "UPDATE_TIME",
    "LAST_CHANGE_DATE",
    "BATCH_NO",
    "BATCH_ID",
    "REMARK",
    "ERROR_CODE",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid inference config: {0}")]
    Json(#[from] serde_json::Error),
}

/// A column that always belongs to one master table when that table declares it as a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedOwner {
    pub column: String,
    pub table: String,
}

impl PinnedOwner {
    pub fn new(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            table: table.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InferenceConfig {
    /// Column names never used to infer a relationship (ASCII case-insensitive).
    pub excluded_columns: Vec<String>,
    /// Ownership pins, consulted in order before declaration order.
    pub pinned_owners: Vec<PinnedOwner>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            excluded_columns: DEFAULT_EXCLUDED_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            pinned_owners: vec![PinnedOwner::new("CLIENT_NO", "CIF_CLIENT")],
        }
    }
}

impl InferenceConfig {
    /// Config with no exclusions and no pins.
    pub fn empty() -> Self {
        Self {
            excluded_columns: Vec::new(),
            pinned_owners: Vec::new(),
        }
    }

    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pins_client_master() {
        let config = InferenceConfig::default();
        assert_eq!(
            config.pinned_owners,
            [PinnedOwner::new("CLIENT_NO", "CIF_CLIENT")]
        );
        assert!(config.excluded_columns.iter().any(|c| c == "COMPANY"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = InferenceConfig::from_json_str(r#"{"excludedColumns": ["TENANT"]}"#).unwrap();
        assert_eq!(config.excluded_columns, ["TENANT"]);
        assert_eq!(config.pinned_owners, InferenceConfig::default().pinned_owners);
    }

    #[test]
    fn test_pins_from_json() {
        let config = InferenceConfig::from_json_str(
            r#"{"pinnedOwners": [{"column": "ACCT_NO", "table": "ACCT_MASTER"}]}"#,
        )
        .unwrap();
        assert_eq!(config.pinned_owners, [PinnedOwner::new("ACCT_NO", "ACCT_MASTER")]);
    }

    #[test]
    fn test_invalid_json() {
        let err = InferenceConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = InferenceConfig::from_path("/nonexistent/ddlgraph.json").unwrap_err();
        assert!(err.to_string().starts_with("Failed to read /nonexistent/ddlgraph.json"));
    }
}
