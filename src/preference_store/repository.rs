//! PreferenceStore Repository
//!
//! ## Responsibilities
//! - Read/write the key-value file backing the store
//! - Atomic replace on write (temp file + rename)

use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File-backed key-value repository
pub struct PreferenceRepository {
    path: PathBuf,
}

impl PreferenceRepository {
    /// Create new repository
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all entries. A missing file is an empty store.
    pub async fn load(&self) -> Result<HashMap<String, String>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "PreferenceStore: No file yet");
                return Ok(HashMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(HashMap::new());
        }

        let entries: HashMap<String, String> = serde_json::from_slice(&raw)?;
        Ok(entries)
    }

    /// Replace the file with the given entries
    pub async fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            keys = entries.len(),
            "PreferenceStore: Saved"
        );

        Ok(())
    }
}
