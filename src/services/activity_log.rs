//! Append-only checkout log.

use crate::{
    models::log_entry::LogEntry,
    store::{BlobStore, LOGS_BLOB, StoreError},
};
use std::sync::Arc;
use tracing::debug;

/// Reads and appends to the `checkoutLogs` blob.
///
/// There is no native append: `append` reads the whole list, pushes one
/// entry and writes the whole list back. Callers that append concurrently
/// must serialize themselves.
#[derive(Clone)]
pub struct ActivityLog {
    blobs: Arc<dyn BlobStore>,
}

impl ActivityLog {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Entries in the order they were appended.
    pub async fn list(&self) -> Result<Vec<LogEntry>, StoreError> {
        let Some(raw) = self.blobs.get(LOGS_BLOB).await? else {
            return Ok(Vec::new());
        };

        let entries: Vec<LogEntry> =
            serde_json::from_str(&raw).map_err(|e| StoreError::malformed(LOGS_BLOB, e))?;
        for entry in &entries {
            entry
                .validate()
                .map_err(|e| StoreError::malformed(LOGS_BLOB, e))?;
        }

        Ok(entries)
    }

    /// Entries newest first, optionally restricted to one key name.
    ///
    /// Entries with equal timestamps keep reverse append order.
    pub async fn list_recent(
        &self,
        key_name: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<LogEntry>, StoreError> {
        let mut entries = self.list().await?;
        if let Some(name) = key_name {
            entries.retain(|e| e.key_name == name);
        }

        entries.reverse();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }

    pub async fn append(&self, entry: &LogEntry) -> Result<(), StoreError> {
        let mut entries = self.list().await?;
        entries.push(entry.clone());

        let raw =
            serde_json::to_string(&entries).map_err(|e| StoreError::malformed(LOGS_BLOB, e))?;
        self.blobs.set(LOGS_BLOB, raw).await?;

        debug!(id = %entry.id, total = entries.len(), "Log entry appended");
        Ok(())
    }
}
