//! Business logic services.
//!
//! The two stores own one blob each; the coordinator is the only component
//! that writes to either of them.

pub mod activity_log;
pub mod coordinator;
pub mod key_store;
