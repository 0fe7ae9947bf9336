//! Persistence for the transaction list
//!
//! The whole dataset is one JSON array. A [`RecordDocument`] reads it in full
//! and replaces it in full; there is no append or partial update.

use crate::error::{CoreError, CoreResult};
use crate::models::Transaction;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Backing storage for the complete, ordered record list
pub trait RecordDocument: Send + Sync {
    /// Read every record.
    ///
    /// `Ok(None)` means the document does not exist yet or holds no data.
    fn read(&self) -> CoreResult<Option<Vec<Transaction>>>;

    /// Replace the document with `records`.
    fn write(&self, records: &[Transaction]) -> CoreResult<()>;

    /// Human-readable location, used in log lines
    fn describe(&self) -> String;
}

/// JSON file on the local filesystem
#[derive(Debug, Clone)]
pub struct JsonFileDocument {
    path: PathBuf,
}

impl JsonFileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordDocument for JsonFileDocument {
    fn read(&self) -> CoreResult<Option<Vec<Transaction>>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        // A literal `null` document is the same as no data
        let records: Option<Vec<Transaction>> = serde_json::from_str(&content)?;
        Ok(records)
    }

    fn write(&self, records: &[Transaction]) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(records)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
            }
        }

        // Write next to the target, then swap it in, so a failed write never
        // leaves a truncated document behind.
        let staging = self.staging_path();
        let result = write_synced(&staging, json.as_bytes()).and_then(|_| {
            std::fs::rename(&staging, &self.path).map_err(|e| CoreError::io(&self.path, e))
        });
        if result.is_err() {
            // Best effort cleanup
            let _ = std::fs::remove_file(&staging);
        }
        result
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    let mut file = std::fs::File::create(path).map_err(|e| CoreError::io(path, e))?;
    file.write_all(bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| CoreError::io(path, e))
}
