//! Shared application state handed to every handler.

use crate::{
    services::{
        activity_log::ActivityLog, coordinator::CheckoutCoordinator, key_store::KeyRecordStore,
    },
    store::BlobStore,
};
use std::sync::Arc;

/// Built once at startup and cloned into each request by Axum.
#[derive(Clone)]
pub struct AppState {
    /// The single writer of the key table and the log; also exposes both for reads
    pub coordinator: Arc<CheckoutCoordinator>,

    /// Backing store, probed by the health check
    pub blobs: Arc<dyn BlobStore>,
}

impl AppState {
    /// Wire both stores and the coordinator over one backing store.
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        let coordinator = CheckoutCoordinator::new(
            KeyRecordStore::new(blobs.clone()),
            ActivityLog::new(blobs.clone()),
        );

        Self {
            coordinator: Arc::new(coordinator),
            blobs,
        }
    }
}
