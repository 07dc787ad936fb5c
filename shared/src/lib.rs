//! Shared types for slotwise
//!
//! Data models and response structures used by the availability client
//! layer. serde-derived, no I/O.

pub mod models;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::*;
pub use response::ApiResponse;
