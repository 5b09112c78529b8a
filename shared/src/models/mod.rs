//! Data models
//!
//! Shared between the webhook handler and the reconciler.

pub mod order;

// Re-exports
pub use order::*;
