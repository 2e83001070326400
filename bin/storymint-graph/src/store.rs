//! Append-only flat-file log of published knowledge assets.
//!
//! One JSON array on disk, rewritten on every append.  A missing or corrupt
//! file is not an error: reads start fresh, so `GET /published-assets` can
//! always answer.  The service is the file's only writer.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One publish, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedRecord {
    pub timestamp: DateTime<Utc>,
    pub content: Value,
    pub result: Value,
}

/// The flat-file store.
#[derive(Debug, Clone)]
pub struct PublishLog {
    path: PathBuf,
}

impl PublishLog {
    /// A log stored as `published_assets.json` under `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("published_assets.json"),
        }
    }

    /// All records, oldest first.  Missing or unparseable files yield the
    /// empty list.
    pub async fn load(&self) -> Vec<PublishedRecord> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no published-assets file yet");
                return Vec::new();
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(records) => records,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "published-assets file unreadable; starting fresh");
                Vec::new()
            }
        }
    }

    /// Append one record and rewrite the file.
    pub async fn append(&self, record: PublishedRecord) -> std::io::Result<()> {
        let mut records = self.load().await;
        records.push(record);

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let body = serde_json::to_vec_pretty(&records)?;
        tokio::fs::write(&self.path, body).await
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
