//! Document sources - Reading ecosystem files from disk

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Well-known ecosystem file name
pub const ECOSYSTEM_FILE: &str = "ecosystem.json";

/// Failures reading a document from disk
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and parse an ecosystem document.
///
/// Only the generic document shape is checked here (valid JSON); field
/// validation belongs to [`crate::loader::load`].
pub fn read_document(path: &Path) -> Result<Value, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| SourceError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let document = serde_json::from_str(&content).map_err(|source| SourceError::ParseFailed {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "ecosystem document read");
    Ok(document)
}

/// Search well-known locations for an ecosystem file.
///
/// Order: `./ecosystem.json`, then the user config directory
/// (`<config>/appfleet/ecosystem.json`).
pub fn discover() -> Option<PathBuf> {
    candidates().into_iter().find(|path| path.exists())
}

fn candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(ECOSYSTEM_FILE)];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("appfleet").join(ECOSYSTEM_FILE));
    }
    candidates
}
