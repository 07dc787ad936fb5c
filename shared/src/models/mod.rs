//! Data models
//!
//! Shared between the availability client and the backend API.
//! Server-issued IDs are strings; records the client created locally carry
//! a temporary [`RecordId`](availability::RecordId) until confirmed.

pub mod assignment;
pub mod availability;
pub mod inventory;
pub mod product;
pub mod reservation;
pub mod schedule_override;
pub mod time_slot;

// Re-exports
pub use assignment::*;
pub use availability::*;
pub use inventory::*;
pub use product::*;
pub use reservation::*;
pub use schedule_override::*;
pub use time_slot::*;
