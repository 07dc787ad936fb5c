//! slotwise-client - availability-slot management
//!
//! Calendar-driven, timeslot-granular resource availability with optimistic
//! updates: a month navigator, a 48-slot day grid, a priority-ordered
//! availability resolver, a mutation coordinator with snapshot rollback,
//! and a per-resource conflict report. Server state is reached through the
//! [`ScheduleApi`] trait; [`NetworkScheduleApi`] is the HTTP implementation.

pub mod calendar;
pub mod cart;
pub mod config;
pub mod conflict;
pub mod coordinator;
pub mod error;
pub mod grid;
pub mod http;
pub mod normalize;
pub mod resolver;

pub use calendar::CalendarNavigator;
pub use cart::{CartKey, CartStore, FileStorage, MemoryStorage, StorageBackend};
pub use config::ClientConfig;
pub use conflict::{ConflictReporter, ConflictSummary};
pub use coordinator::{
    MutationCoordinator, MutationPhase, Notification, RejectReason, SlotKey, ToggleOutcome,
};
pub use error::{ClientError, ClientResult};
pub use grid::{SlotGrid, SlotView};
pub use http::{NetworkScheduleApi, ScheduleApi};
pub use resolver::{AvailabilityContext, SlotState, ToggleScope};

// Re-export shared types for convenience
pub use shared::{
    Assignment, AvailabilityRecord, CartLine, Product, RecordId, RecordKind, Reservation,
    ScheduleOverride, TimeSlot,
};
