//! HTTP request handlers (route handlers).
//!
//! Handlers only translate HTTP to coordinator and store calls; every
//! mutation goes through `CheckoutCoordinator`.

/// Health check endpoint
pub mod health;
/// Key inventory and check-out/check-in endpoints
pub mod keys;
/// Checkout log endpoint
pub mod logs;
