//! Shared types for the booking sync workspace
//!
//! Common types used across crates: the unified error system and the
//! normalized order model.

pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};
