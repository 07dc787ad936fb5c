//! Slot Grid
//!
//! Assembles the per-day view of the 48 canonical slots, split into AM and
//! PM display columns. Each cell carries its resolved state, whether a
//! mutation is in flight for it, and whether clicking it would do anything.

use std::collections::HashSet;

use chrono::NaiveDate;
use shared::{Period, TimeSlot};

use crate::coordinator::SlotKey;
use crate::resolver::{AvailabilityContext, SlotState, ToggleScope};

/// Render state of one slot cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    pub slot: TimeSlot,
    pub state: SlotState,
    /// A mutation for this slot is in flight; the cell is disabled
    pub loading: bool,
    /// Clicking this cell invokes the toggle; false means a click is a no-op
    pub actionable: bool,
}

/// One day's slot grid, partitioned for display
#[derive(Debug, Clone)]
pub struct SlotGrid {
    pub am: Vec<SlotView>,
    pub pm: Vec<SlotView>,
}

impl SlotGrid {
    /// Build the grid for a date within a toggle scope
    pub fn build(
        ctx: &AvailabilityContext,
        scope: &ToggleScope,
        date: NaiveDate,
        loading: &HashSet<SlotKey>,
    ) -> Self {
        let mut am = Vec::new();
        let mut pm = Vec::new();

        for slot in TimeSlot::day_slots() {
            let state = ctx.resolve(scope.resource_id.as_deref(), date, &slot.value);
            let key = SlotKey {
                date,
                slot: slot.value.clone(),
                resource_id: scope.resource_id.clone(),
            };
            let is_loading = loading.contains(&key);
            // Unsetting existing coverage is always actionable; setting new
            // coverage is gated by the resolver's priority chain.
            let covered = ctx.covering(scope, date, &slot.value).is_some();
            let actionable = !is_loading && (covered || state.allows_set(scope));

            let view = SlotView {
                state,
                loading: is_loading,
                actionable,
                slot: slot.clone(),
            };
            match slot.period {
                Period::Am => am.push(view),
                Period::Pm => pm.push(view),
            }
        }

        Self { am, pm }
    }

    /// All cells, AM column first
    pub fn iter(&self) -> impl Iterator<Item = &SlotView> {
        self.am.iter().chain(self.pm.iter())
    }
}
