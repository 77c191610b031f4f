//! Whole-value blob storage.
//!
//! The backing store only knows how to read or replace a named blob in one
//! piece. There is no append, no partial update and no compare-and-swap;
//! everything above this layer works on entire collections.

pub mod file;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;
pub use postgres::PgBlobStore;

/// Blob holding the serialized key table.
pub const KEYS_BLOB: &str = "keys";

/// Blob holding the serialized checkout log.
pub const LOGS_BLOB: &str = "checkoutLogs";

/// Failure reading, writing or decoding a blob.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem read or write failed.
    #[error("I/O error on blob '{blob}': {source}")]
    Io {
        blob: String,
        #[source]
        source: std::io::Error,
    },

    /// PostgreSQL query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Blob exists but does not hold a valid collection.
    #[error("Malformed blob '{blob}': {reason}")]
    Malformed { blob: String, reason: String },
}

impl StoreError {
    pub(crate) fn io(blob: &str, source: std::io::Error) -> Self {
        StoreError::Io {
            blob: blob.to_string(),
            source,
        }
    }

    pub(crate) fn malformed(blob: &str, reason: impl ToString) -> Self {
        StoreError::Malformed {
            blob: blob.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Opaque key-value store with get/set-whole-value semantics.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Current value of `name`, or `None` if it has never been written.
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value of `name`. Once this returns `Ok`, subsequent
    /// `get` calls observe `value` in full.
    async fn set(&self, name: &str, value: String) -> Result<(), StoreError>;

    /// Cheap reachability probe used by the health check.
    async fn ping(&self) -> Result<(), StoreError> {
        self.get(KEYS_BLOB).await.map(|_| ())
    }
}
