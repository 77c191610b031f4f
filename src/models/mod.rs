//! Data models for the key table and the checkout log.
//!
//! Each model has a persisted form (the records inside a blob) and the
//! request/response bodies of its endpoints.

/// Physical key model
pub mod key;
/// Checkout log model
pub mod log_entry;
