//! Availability Record Model
//!
//! One record represents one externally-sourced fact about a date: the set
//! of slots explicitly opened, blocked, or overridden for a resource. A
//! record whose slot set becomes empty is deleted, never kept empty.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Which state source a record contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Opened,
    Blocked,
    ScheduleOverride,
}

/// Record identifier
///
/// Optimistically inserted records carry a temporary id until the server
/// confirms the create. Temporary ids must never be used for id-keyed
/// follow-on mutations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    Temp(Uuid),
    Remote(String),
}

impl RecordId {
    /// Generate a fresh temporary id
    pub fn new_temp() -> Self {
        Self::Temp(Uuid::new_v4())
    }

    pub fn is_temp(&self) -> bool {
        matches!(self, Self::Temp(_))
    }

    /// The server-issued id, when confirmed
    pub fn remote(&self) -> Option<&str> {
        match self {
            Self::Remote(id) => Some(id),
            Self::Temp(_) => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temp(uuid) => write!(f, "tmp:{}", uuid),
            Self::Remote(id) => write!(f, "{}", id),
        }
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.strip_prefix("tmp:") {
            Some(uuid) => Uuid::parse_str(uuid)
                .map(Self::Temp)
                .map_err(serde::de::Error::custom),
            None => Ok(Self::Remote(raw)),
        }
    }
}

/// Availability record entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub id: RecordId,
    pub date: NaiveDate,
    /// Set for `ScheduleOverride` records, absent for tenant-wide ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub kind: RecordKind,
    pub timeslots: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub owner: String,
}

impl AvailabilityRecord {
    /// Whether this record covers the given (date, slot) pair
    pub fn covers(&self, date: NaiveDate, slot: &str) -> bool {
        self.date == date && self.timeslots.contains(slot)
    }
}

/// Create availability record payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRecordCreate {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub kind: RecordKind,
    pub timeslots: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub owner: String,
}

/// Update availability record payload (replaces the slot set)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRecordUpdate {
    pub timeslots: BTreeSet<String>,
}
