//! Configuration and shared error types for UrlGuard.
//!
//! This crate holds what the HTTP layer and the server binary share: the
//! environment-driven [`UrlGuardConfig`] and the [`UrlGuardError`] type used
//! when that configuration is unusable.

mod config;
mod error;

pub use config::UrlGuardConfig;
pub use error::{UrlGuardError, UrlGuardResult};
