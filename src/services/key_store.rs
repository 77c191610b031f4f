//! Current-state table of keys.
//!
//! The whole table is one blob: every read parses all of it and every write
//! replaces all of it. Records are validated on the way in, so a caller never
//! sees a key whose holder fields disagree with its status.

use crate::{
    models::key::{Key, KeySummary, StatusFilter, StoredKey},
    store::{BlobStore, KEYS_BLOB, StoreError},
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Reads and replaces the `keys` blob.
#[derive(Clone)]
pub struct KeyRecordStore {
    blobs: Arc<dyn BlobStore>,
}

impl KeyRecordStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// All keys in stored order. Empty if the blob was never written.
    ///
    /// # Errors
    ///
    /// - `StoreError::Malformed` if the blob is not a valid key list, a record
    ///   has a blank label or breaks the holder/status invariant, or two
    ///   records share an id
    /// - Any read error of the underlying store
    pub async fn list(&self) -> Result<Vec<Key>, StoreError> {
        let Some(raw) = self.blobs.get(KEYS_BLOB).await? else {
            return Ok(Vec::new());
        };

        let stored: Vec<StoredKey> =
            serde_json::from_str(&raw).map_err(|e| StoreError::malformed(KEYS_BLOB, e))?;

        let mut seen = HashSet::with_capacity(stored.len());
        let mut keys = Vec::with_capacity(stored.len());
        for record in stored {
            if !seen.insert(record.id.clone()) {
                return Err(StoreError::malformed(
                    KEYS_BLOB,
                    format!("duplicate key id '{}'", record.id),
                ));
            }
            keys.push(Key::try_from(record).map_err(|e| StoreError::malformed(KEYS_BLOB, e))?);
        }

        debug!(count = keys.len(), "Loaded keys");
        Ok(keys)
    }

    /// Keys matching `filter`, or all keys when `None`.
    pub async fn list_filtered(
        &self,
        filter: Option<StatusFilter>,
    ) -> Result<Vec<Key>, StoreError> {
        let keys = self.list().await?;
        Ok(match filter {
            Some(filter) => keys.into_iter().filter(|k| filter.matches(k)).collect(),
            None => keys,
        })
    }

    pub async fn get(&self, id: &str) -> Result<Option<Key>, StoreError> {
        Ok(self.list().await?.into_iter().find(|k| k.id == id))
    }

    pub async fn summary(&self) -> Result<KeySummary, StoreError> {
        Ok(KeySummary::from_keys(&self.list().await?))
    }

    /// Replace the whole table with `keys`.
    pub async fn replace_all(&self, keys: &[Key]) -> Result<(), StoreError> {
        let stored: Vec<StoredKey> = keys.iter().map(StoredKey::from).collect();
        let raw = serde_json::to_string(&stored).map_err(|e| StoreError::malformed(KEYS_BLOB, e))?;

        self.blobs.set(KEYS_BLOB, raw).await?;
        debug!(count = keys.len(), "Replaced keys");
        Ok(())
    }
}
