//! Initial record loading.
//!
//! The data provider is a host capability: it is called once at session
//! start and its failures are handed to the caller unchanged. Nothing here
//! retries.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Record path must not be empty")]
    MissingPath,

    #[error("Failed to read record {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse record {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn load(&self, path: &str) -> Result<Value, LoadError>;
}

/// Reads JSON records from files below a root directory.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    root: PathBuf,
}

impl JsonFileProvider {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DataProvider for JsonFileProvider {
    async fn load(&self, path: &str) -> Result<Value, LoadError> {
        if path.trim().is_empty() {
            return Err(LoadError::MissingPath);
        }
        let full = self.root.join(path);
        let text = tokio::fs::read_to_string(&full)
            .await
            .map_err(|source| LoadError::Io {
                path: full.display().to_string(),
                source,
            })?;
        let record = serde_json::from_str(&text).map_err(|source| LoadError::Parse {
            path: full.display().to_string(),
            source,
        })?;
        tracing::info!(path = %full.display(), "Record loaded");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn loads_json_record() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("customer.json"),
            r#"{"forms": [{"name": "Jane"}]}"#,
        )
        .unwrap();

        let record = JsonFileProvider::new(dir.path())
            .load("customer.json")
            .await
            .unwrap();
        assert_eq!(record["forms"][0]["name"], "Jane");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonFileProvider::new(dir.path()).load("nope.json").await;
        assert_matches!(result, Err(LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{").unwrap();
        let result = JsonFileProvider::new(dir.path()).load("bad.json").await;
        assert_matches!(result, Err(LoadError::Parse { .. }));
    }

    #[tokio::test]
    async fn empty_path_is_rejected() {
        let result = JsonFileProvider::new(".").load("  ").await;
        assert_matches!(result, Err(LoadError::MissingPath));
    }
}
