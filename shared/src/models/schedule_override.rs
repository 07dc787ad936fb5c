//! Schedule Override Model

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-resource availability exception status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideStatus {
    Available,
    Unavailable,
    Joined,
}

/// Resource-specific (table/technician) availability exception
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOverride {
    pub id: String,
    pub resource_id: String,
    pub date: NaiveDate,
    pub timeslots: BTreeSet<String>,
    pub status: OverrideStatus,
    /// Partner resources when `status` is `Joined`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joined_with: Vec<String>,
}

impl ScheduleOverride {
    /// Whether this override covers the given (date, slot) pair
    pub fn covers(&self, date: NaiveDate, slot: &str) -> bool {
        self.date == date && self.timeslots.contains(slot)
    }
}
