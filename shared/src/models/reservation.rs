//! Reservation Model
//!
//! Read-only from the client layer's perspective: consumed for availability
//! resolution, never mutated here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Seated,
    Completed,
    Cancelled,
}

/// Reservation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub resource_id: String,
    pub date: NaiveDate,
    /// Canonical "HH:MM" slot value
    pub time: String,
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_size: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
}

impl Reservation {
    /// Cancelled reservations do not occupy a slot
    pub fn is_active(&self) -> bool {
        self.status != ReservationStatus::Cancelled
    }
}
