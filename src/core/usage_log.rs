//! Append-only token usage log backed by a single JSON file

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::core::errors::Result;
use crate::core::models::UsageRecord;

/// Usage log stored as a JSON array of `{input, output}` records.
///
/// Each append reads the whole file and rewrites it. Clones share one lock, so
/// appends within a process are serialized; several processes appending at
/// once can still lose records.
#[derive(Debug, Clone)]
pub struct UsageLog {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl UsageLog {
    /// Create a usage log at the given path. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. Failures are logged and never returned.
    pub async fn append(&self, input_tokens: u64, output_tokens: u64) {
        match self.try_append(input_tokens, output_tokens).await {
            Ok(count) => debug!(
                "Tokens saved: input={}, output={} ({} records)",
                input_tokens, output_tokens, count
            ),
            Err(e) => warn!("Error saving tokens to {}: {}", self.path.display(), e),
        }
    }

    /// Read every record in call order. Failures are logged and yield an empty list.
    pub async fn read_all(&self) -> Vec<UsageRecord> {
        match self.try_read_all().await {
            Ok(records) => records,
            Err(e) => {
                warn!("Error reading tokens file {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Read every record, reporting I/O and parse failures.
    ///
    /// A missing file is an empty log.
    pub async fn try_read_all(&self) -> Result<Vec<UsageRecord>> {
        let _guard = self.lock.lock().await;
        self.read_unlocked().await
    }

    async fn read_unlocked(&self) -> Result<Vec<UsageRecord>> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&data)?)
    }

    async fn try_append(&self, input_tokens: u64, output_tokens: u64) -> Result<usize> {
        let _guard = self.lock.lock().await;

        // An unreadable log is left untouched rather than overwritten.
        let mut records = self.read_unlocked().await?;
        records.push(UsageRecord {
            input: input_tokens,
            output: output_tokens,
        });

        let content = serde_json::to_string_pretty(&records)?;
        tokio::fs::write(&self.path, content).await?;
        debug!("Wrote usage log {}", self.path.display());

        Ok(records.len())
    }
}
