//! Time Slot Model

use serde::{Deserialize, Serialize};

/// Number of canonical half-hour slots in a day
pub const SLOTS_PER_DAY: usize = 48;

/// Half of the day a slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Period {
    Am,
    Pm,
}

/// Immutable half-hour time slot value
///
/// Generated once per day (48 instances), never persisted. The `value`
/// field is the canonical key used everywhere a slot is referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Canonical 24h "HH:MM" value, 30-minute granularity
    pub value: String,
    /// 12-hour display label, e.g. "9:30 PM"
    pub display_label: String,
    pub period: Period,
}

impl TimeSlot {
    fn from_parts(hour: u32, minute: u32) -> Self {
        let period = if hour < 12 { Period::Am } else { Period::Pm };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        let suffix = match period {
            Period::Am => "AM",
            Period::Pm => "PM",
        };
        Self {
            value: format!("{:02}:{:02}", hour, minute),
            display_label: format!("{}:{:02} {}", display_hour, minute, suffix),
            period,
        }
    }

    /// The 48 canonical half-hour slots of a day, in order
    pub fn day_slots() -> Vec<TimeSlot> {
        (0..24)
            .flat_map(|hour| [0, 30].into_iter().map(move |minute| (hour, minute)))
            .map(|(hour, minute)| Self::from_parts(hour, minute))
            .collect()
    }

    /// Parse an "HH:MM" value into (hour, minute)
    ///
    /// Returns `None` when the value is not one of the 48 canonical slots.
    pub fn parse_value(value: &str) -> Option<(u32, u32)> {
        let (h, m) = value.split_once(':')?;
        if h.len() != 2 || m.len() != 2 {
            return None;
        }
        let hour: u32 = h.parse().ok()?;
        let minute: u32 = m.parse().ok()?;
        if hour < 24 && (minute == 0 || minute == 30) {
            Some((hour, minute))
        } else {
            None
        }
    }

    /// Whether `value` is one of the 48 canonical slot values
    pub fn is_canonical(value: &str) -> bool {
        Self::parse_value(value).is_some()
    }
}
