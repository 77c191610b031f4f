//! In-process blob store.

use super::{BlobStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Blobs kept in a map for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        // A poisoned lock still holds a fully written value
        let blobs = self.blobs.read().unwrap_or_else(|e| e.into_inner());
        Ok(blobs.get(name).cloned())
    }

    async fn set(&self, name: &str, value: String) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().unwrap_or_else(|e| e.into_inner());
        blobs.insert(name.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_blob_is_none() {
        let store = MemoryBlobStore::new();
        assert_eq!(store.get("keys").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_replaces_whole_value() {
        let store = MemoryBlobStore::new();
        store.set("keys", "[1,2,3]".to_string()).await.unwrap();
        store.set("keys", "[]".to_string()).await.unwrap();
        assert_eq!(store.get("keys").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("checkoutLogs").await.unwrap(), None);
    }
}
