//! Availability Resolver
//!
//! Resolves the effective display/interaction state of one
//! (resource, date, time) cell from independently-sourced record sets.
//! Strict priority, highest first: NotOpened, Blocked, resource-specific
//! Unavailable, Joined, Reserved, Available. Pure function of the current
//! in-memory sets; re-evaluated on every mutation, never memoized.

use chrono::NaiveDate;
use shared::{
    AvailabilityRecord, OverrideStatus, RecordKind, Reservation, ScheduleOverride,
};

/// Effective state of one slot after resolution
///
/// A given (date, time) pair for a given resource has exactly one of these
/// states, even when several overlapping record kinds apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// The tenant has opened other slots, but not this one
    NotOpened,
    /// Explicitly denied regardless of opened state
    Blocked,
    /// Resource-specific unavailable override
    Unavailable,
    /// Resource is joined with partners for this slot
    Joined { partners: Vec<String> },
    /// An active reservation occupies this slot
    Reserved,
    Available,
}

impl SlotState {
    /// Whether a new record may be set on top of this state in `scope`
    ///
    /// Unsetting an existing record is always allowed; this gate applies to
    /// creating coverage where none exists. Blocking a never-opened slot and
    /// overriding a closed slot are refused before any network call.
    pub fn allows_set(&self, scope: &ToggleScope) -> bool {
        match scope.kind {
            RecordKind::Opened => true,
            RecordKind::Blocked => *self != SlotState::NotOpened,
            RecordKind::ScheduleOverride => {
                *self != SlotState::NotOpened && *self != SlotState::Blocked
            }
        }
    }
}

/// Which record set a toggle operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleScope {
    pub kind: RecordKind,
    /// Required for `ScheduleOverride` toggles, absent for tenant-wide ones
    pub resource_id: Option<String>,
}

impl ToggleScope {
    pub fn opened() -> Self {
        Self {
            kind: RecordKind::Opened,
            resource_id: None,
        }
    }

    pub fn blocked() -> Self {
        Self {
            kind: RecordKind::Blocked,
            resource_id: None,
        }
    }

    pub fn resource(resource_id: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::ScheduleOverride,
            resource_id: Some(resource_id.into()),
        }
    }
}

/// In-memory record sets a resolution runs against
#[derive(Debug, Clone, Default)]
pub struct AvailabilityContext {
    /// Explicit allow-list records (tenant-wide)
    pub opened: Vec<AvailabilityRecord>,
    /// Explicit deny-list records (tenant-wide)
    pub blocked: Vec<AvailabilityRecord>,
    /// Manual per-resource unavailable records written by this client
    pub manual_overrides: Vec<AvailabilityRecord>,
    /// Server-sourced per-resource exceptions (unavailable/joined)
    pub overrides: Vec<ScheduleOverride>,
    pub reservations: Vec<Reservation>,
}

impl AvailabilityContext {
    /// Resolve the effective state for a (resource, date, time) tuple
    pub fn resolve(&self, resource_id: Option<&str>, date: NaiveDate, slot: &str) -> SlotState {
        // 1. Closed-by-default once the tenant has any opened record;
        //    open-by-default when it has none.
        if !self.opened.is_empty() && !self.opened.iter().any(|r| r.covers(date, slot)) {
            return SlotState::NotOpened;
        }

        // 2. Blocked overrides availability regardless of step 1.
        if self.blocked.iter().any(|r| r.covers(date, slot)) {
            return SlotState::Blocked;
        }

        if let Some(rid) = resource_id {
            // 3. Resource-specific unavailable: server override or a manual
            //    record written through the coordinator.
            let unavailable_override = self.overrides.iter().any(|o| {
                o.resource_id == rid
                    && o.status == OverrideStatus::Unavailable
                    && o.covers(date, slot)
            });
            let manual = self
                .manual_overrides
                .iter()
                .any(|r| r.resource_id.as_deref() == Some(rid) && r.covers(date, slot));
            if unavailable_override || manual {
                return SlotState::Unavailable;
            }

            // 4. Joined, with partner identifiers.
            if let Some(joined) = self.overrides.iter().find(|o| {
                o.resource_id == rid && o.status == OverrideStatus::Joined && o.covers(date, slot)
            }) {
                return SlotState::Joined {
                    partners: joined.joined_with.clone(),
                };
            }

            // 5. Reserved, non-cancelled only.
            if self
                .reservations
                .iter()
                .any(|r| r.resource_id == rid && r.is_active() && r.date == date && r.time == slot)
            {
                return SlotState::Reserved;
            }
        }

        SlotState::Available
    }

    /// The record in `scope`'s set covering (date, slot), if any
    pub fn covering(
        &self,
        scope: &ToggleScope,
        date: NaiveDate,
        slot: &str,
    ) -> Option<&AvailabilityRecord> {
        self.records(scope.kind).iter().find(|r| {
            r.covers(date, slot)
                && (scope.kind != RecordKind::ScheduleOverride
                    || r.resource_id == scope.resource_id)
        })
    }

    /// The record set a kind routes to
    pub fn records(&self, kind: RecordKind) -> &Vec<AvailabilityRecord> {
        match kind {
            RecordKind::Opened => &self.opened,
            RecordKind::Blocked => &self.blocked,
            RecordKind::ScheduleOverride => &self.manual_overrides,
        }
    }

    pub fn records_mut(&mut self, kind: RecordKind) -> &mut Vec<AvailabilityRecord> {
        match kind {
            RecordKind::Opened => &mut self.opened,
            RecordKind::Blocked => &mut self.blocked,
            RecordKind::ScheduleOverride => &mut self.manual_overrides,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{RecordId, ReservationStatus};
    use std::collections::BTreeSet;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn record(kind: RecordKind, d: &str, slots: &[&str]) -> AvailabilityRecord {
        AvailabilityRecord {
            id: RecordId::Remote(format!("{kind:?}-{d}")),
            date: date(d),
            resource_id: None,
            kind,
            timeslots: slots.iter().map(|s| s.to_string()).collect(),
            reason: None,
            owner: "tenant-1".into(),
        }
    }

    fn override_for(
        rid: &str,
        d: &str,
        slots: &[&str],
        status: OverrideStatus,
        joined_with: &[&str],
    ) -> ScheduleOverride {
        ScheduleOverride {
            id: format!("ov-{rid}"),
            resource_id: rid.into(),
            date: date(d),
            timeslots: slots.iter().map(|s| s.to_string()).collect(),
            status,
            joined_with: joined_with.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn reservation(rid: &str, d: &str, time: &str, status: ReservationStatus) -> Reservation {
        Reservation {
            id: format!("res-{rid}-{time}"),
            resource_id: rid.into(),
            date: date(d),
            time: time.into(),
            status,
            party_size: None,
            guest_name: None,
        }
    }

    #[test]
    fn test_open_default_when_no_opened_records() {
        let ctx = AvailabilityContext::default();
        for slot in ["00:00", "09:00", "23:30"] {
            assert_eq!(
                ctx.resolve(None, date("2025-03-01"), slot),
                SlotState::Available
            );
        }
    }

    #[test]
    fn test_closed_default_once_opened_records_exist() {
        // Scenario 1: opened = {2025-03-01: ["09:00"]}
        let ctx = AvailabilityContext {
            opened: vec![record(RecordKind::Opened, "2025-03-01", &["09:00"])],
            ..Default::default()
        };
        assert_eq!(
            ctx.resolve(None, date("2025-03-01"), "09:00"),
            SlotState::Available
        );
        assert_eq!(
            ctx.resolve(None, date("2025-03-01"), "09:30"),
            SlotState::NotOpened
        );
        // An opened record for one date closes every other date too.
        assert_eq!(
            ctx.resolve(None, date("2025-03-02"), "09:00"),
            SlotState::NotOpened
        );
    }

    #[test]
    fn test_blocked_overrides_opened() {
        // Scenario 2: block 09:00 on an opened slot.
        let ctx = AvailabilityContext {
            opened: vec![record(RecordKind::Opened, "2025-03-01", &["09:00"])],
            blocked: vec![record(RecordKind::Blocked, "2025-03-01", &["09:00"])],
            ..Default::default()
        };
        assert_eq!(
            ctx.resolve(None, date("2025-03-01"), "09:00"),
            SlotState::Blocked
        );
    }

    #[test]
    fn test_not_opened_beats_blocked() {
        let ctx = AvailabilityContext {
            opened: vec![record(RecordKind::Opened, "2025-03-01", &["10:00"])],
            blocked: vec![record(RecordKind::Blocked, "2025-03-01", &["09:00"])],
            ..Default::default()
        };
        assert_eq!(
            ctx.resolve(None, date("2025-03-01"), "09:00"),
            SlotState::NotOpened
        );
    }

    #[test]
    fn test_unavailable_override_beats_reservation() {
        let ctx = AvailabilityContext {
            overrides: vec![override_for(
                "t1",
                "2025-03-01",
                &["18:00"],
                OverrideStatus::Unavailable,
                &[],
            )],
            reservations: vec![reservation(
                "t1",
                "2025-03-01",
                "18:00",
                ReservationStatus::Confirmed,
            )],
            ..Default::default()
        };
        assert_eq!(
            ctx.resolve(Some("t1"), date("2025-03-01"), "18:00"),
            SlotState::Unavailable
        );
    }

    #[test]
    fn test_joined_reports_partners_both_ways() {
        // Scenario 4: two tables joined with each other.
        let ctx = AvailabilityContext {
            overrides: vec![
                override_for("t1", "2025-03-01", &["18:00"], OverrideStatus::Joined, &["t2"]),
                override_for("t2", "2025-03-01", &["18:00"], OverrideStatus::Joined, &["t1"]),
            ],
            ..Default::default()
        };
        assert_eq!(
            ctx.resolve(Some("t1"), date("2025-03-01"), "18:00"),
            SlotState::Joined {
                partners: vec!["t2".to_string()]
            }
        );
        assert_eq!(
            ctx.resolve(Some("t2"), date("2025-03-01"), "18:00"),
            SlotState::Joined {
                partners: vec!["t1".to_string()]
            }
        );
    }

    #[test]
    fn test_cancelled_reservation_is_ignored() {
        let ctx = AvailabilityContext {
            reservations: vec![
                reservation("t1", "2025-03-01", "18:00", ReservationStatus::Cancelled),
                reservation("t1", "2025-03-01", "18:30", ReservationStatus::Confirmed),
            ],
            ..Default::default()
        };
        assert_eq!(
            ctx.resolve(Some("t1"), date("2025-03-01"), "18:00"),
            SlotState::Available
        );
        assert_eq!(
            ctx.resolve(Some("t1"), date("2025-03-01"), "18:30"),
            SlotState::Reserved
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let ctx = AvailabilityContext {
            opened: vec![record(RecordKind::Opened, "2025-03-01", &["09:00", "18:00"])],
            blocked: vec![record(RecordKind::Blocked, "2025-03-01", &["09:00"])],
            overrides: vec![override_for(
                "t1",
                "2025-03-01",
                &["18:00"],
                OverrideStatus::Unavailable,
                &[],
            )],
            ..Default::default()
        };
        for slot in ["09:00", "09:30", "18:00"] {
            let first = ctx.resolve(Some("t1"), date("2025-03-01"), slot);
            for _ in 0..3 {
                assert_eq!(ctx.resolve(Some("t1"), date("2025-03-01"), slot), first);
            }
        }
    }

    #[test]
    fn test_allows_set() {
        assert!(SlotState::NotOpened.allows_set(&ToggleScope::opened()));
        assert!(!SlotState::NotOpened.allows_set(&ToggleScope::blocked()));
        assert!(SlotState::Available.allows_set(&ToggleScope::blocked()));
        assert!(!SlotState::Blocked.allows_set(&ToggleScope::resource("t1")));
        assert!(SlotState::Reserved.allows_set(&ToggleScope::resource("t1")));
    }
}
