//! Optimistic Mutation Coordinator
//!
//! Applies a slot toggle to local state immediately, issues the matching
//! network mutation, and reconciles or rolls back when it completes. Each
//! pending mutation is an explicit three-state value
//! (`Applying(snapshot)` → `Committed` | `RolledBack(snapshot)`) so tests
//! can assert on the intermediate state without relying on timing.
//!
//! Concurrency discipline: one mutation per slot key at a time (the loading
//! set doubles as the grid's re-entrancy guard); mutations on different
//! slots run concurrently with no shared lock held across awaits. Every
//! slot key additionally carries a monotonic sequence number, and a
//! completion handler only applies its effect while its sequence is still
//! the newest for that key and the context has not been reloaded since
//! dispatch. A slow response can no longer overwrite state the user has
//! since changed or refreshed.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use shared::{
    AvailabilityRecord, AvailabilityRecordCreate, AvailabilityRecordUpdate, RecordId, RecordKind,
    TimeSlot,
};

use crate::error::{ClientError, ClientResult};
use crate::http::ScheduleApi;
use crate::resolver::{AvailabilityContext, SlotState, ToggleScope};

/// Identity of one toggleable cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub date: NaiveDate,
    pub slot: String,
    pub resource_id: Option<String>,
}

impl SlotKey {
    fn new(scope: &ToggleScope, date: NaiveDate, slot: &str) -> Self {
        Self {
            date,
            slot: slot.to_string(),
            resource_id: scope.resource_id.clone(),
        }
    }
}

/// Lifecycle of one mutation
#[derive(Debug, Clone)]
pub enum MutationPhase {
    /// Optimistic change applied, network call in flight
    ///
    /// The snapshot is the pre-mutation copy of the one record the toggle
    /// touches (`None` when the toggle creates a record).
    Applying {
        snapshot: Option<AvailabilityRecord>,
        seq: u64,
    },
    /// Server confirmed; optimistic state is authoritative until next reload
    Committed { seq: u64 },
    /// Network failure; the touched record reverted to the snapshot
    RolledBack {
        snapshot: Option<AvailabilityRecord>,
        seq: u64,
    },
}

/// Why a toggle was refused before dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// A mutation for this slot is already in flight
    InFlight,
    /// A higher-priority closed state governs this slot
    NotActionable(SlotState),
    /// The covering record's create has not been confirmed yet
    UnconfirmedRecord,
}

impl RejectReason {
    fn message(&self) -> String {
        match self {
            Self::InFlight => "This slot is still saving, try again in a moment".to_string(),
            Self::NotActionable(state) => {
                format!("This slot cannot be changed here ({state:?})")
            }
            Self::UnconfirmedRecord => {
                "This change is still being confirmed, try again in a moment".to_string()
            }
        }
    }
}

/// Result of a toggle attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Mutation confirmed by the server
    Committed,
    /// Optimistic change reverted after a failed mutation
    RolledBack,
    /// Refused before dispatch; no network call was made
    Rejected(RejectReason),
}

/// Dismissable user notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub is_error: bool,
}

/// The network operation a toggle resolved to
enum MutationOp {
    Create {
        temp_id: RecordId,
        payload: AvailabilityRecordCreate,
    },
    Update {
        id: String,
        payload: AvailabilityRecordUpdate,
    },
    Delete {
        id: String,
    },
}

impl MutationOp {
    /// Id of the record this operation touches in local state
    fn touched_id(&self) -> RecordId {
        match self {
            Self::Create { temp_id, .. } => temp_id.clone(),
            Self::Update { id, .. } | Self::Delete { id } => RecordId::Remote(id.clone()),
        }
    }
}

struct CoordinatorState {
    context: AvailabilityContext,
    loading: HashSet<SlotKey>,
    slot_seq: HashMap<SlotKey, u64>,
    next_seq: u64,
    /// Bumped on every context reload; completions from an older generation
    /// are dropped.
    generation: u64,
    mutations: HashMap<SlotKey, MutationPhase>,
    notifications: Vec<Notification>,
}

/// Coordinates optimistic slot toggles against a [`ScheduleApi`]
pub struct MutationCoordinator<A: ScheduleApi> {
    api: A,
    owner: String,
    state: Mutex<CoordinatorState>,
}

impl<A: ScheduleApi> MutationCoordinator<A> {
    pub fn new(api: A, owner: impl Into<String>) -> Self {
        Self {
            api,
            owner: owner.into(),
            state: Mutex::new(CoordinatorState {
                context: AvailabilityContext::default(),
                loading: HashSet::new(),
                slot_seq: HashMap::new(),
                next_seq: 0,
                generation: 0,
                mutations: HashMap::new(),
                notifications: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the in-memory record sets with freshly fetched server state
    ///
    /// Mutations dispatched before the reload become stale: their
    /// completions no longer touch local state.
    pub fn load_context(&self, context: AvailabilityContext) {
        let mut st = self.lock();
        st.context = context;
        st.mutations.clear();
        st.generation = st.generation.wrapping_add(1);
    }

    /// Fetch all record sets for a date and load them
    pub async fn refresh(&self, date: NaiveDate) -> ClientResult<()> {
        let context = AvailabilityContext {
            opened: self.api.list_records(RecordKind::Opened, date).await?,
            blocked: self.api.list_records(RecordKind::Blocked, date).await?,
            manual_overrides: self
                .api
                .list_records(RecordKind::ScheduleOverride, date)
                .await?,
            overrides: self.api.list_overrides(date).await?,
            reservations: self.api.list_reservations(date).await?,
        };
        self.load_context(context);
        Ok(())
    }

    /// Current record sets (cloned for rendering)
    pub fn context(&self) -> AvailabilityContext {
        self.lock().context.clone()
    }

    /// Resolve a slot's effective state against current local state
    pub fn resolve(&self, resource_id: Option<&str>, date: NaiveDate, slot: &str) -> SlotState {
        self.lock().context.resolve(resource_id, date, slot)
    }

    /// Slot keys with a mutation in flight
    pub fn loading_slots(&self) -> HashSet<SlotKey> {
        self.lock().loading.clone()
    }

    /// Lifecycle phase of the most recent mutation for a slot, if any
    pub fn mutation_phase(&self, key: &SlotKey) -> Option<MutationPhase> {
        self.lock().mutations.get(key).cloned()
    }

    /// Drain accumulated user notifications
    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.lock().notifications)
    }

    /// Toggle one slot within a scope
    ///
    /// Set/unset is decided against the scope's record set: removing the
    /// last slot of a record deletes the record, otherwise the slot set is
    /// replaced; an uncovered slot creates a new record under a temporary
    /// id. The optimistic change is visible to [`resolve`](Self::resolve)
    /// while the network call is in flight.
    pub async fn toggle_slot(
        &self,
        scope: &ToggleScope,
        date: NaiveDate,
        slot: &str,
    ) -> ClientResult<ToggleOutcome> {
        if !TimeSlot::is_canonical(slot) {
            return Err(ClientError::Validation(format!(
                "'{slot}' is not a canonical slot value"
            )));
        }
        let key = SlotKey::new(scope, date, slot);

        // Phase 1: validate and apply the optimistic change under the lock.
        let (op, seq, generation) = {
            let mut st = self.lock();

            if st.loading.contains(&key) {
                return Ok(self.reject(&mut st, RejectReason::InFlight));
            }

            // Pre-mutation copy of the one record this toggle touches,
            // restored on failure. The rest of the set is never rolled back.
            let snapshot = st.context.covering(scope, date, slot).cloned();

            let covering = snapshot
                .as_ref()
                .map(|r| (r.id.clone(), r.timeslots.clone()));

            let op = match covering {
                Some((id, timeslots)) => {
                    // Unset path. Follow-on mutations are keyed by id, so a
                    // still-temporary id cannot be trusted yet.
                    let Some(remote_id) = id.remote().map(str::to_string) else {
                        return Ok(self.reject(&mut st, RejectReason::UnconfirmedRecord));
                    };
                    let mut remaining = timeslots;
                    remaining.remove(slot);

                    let records = st.context.records_mut(scope.kind);
                    if remaining.is_empty() {
                        // Last slot removed: the record goes away entirely.
                        records.retain(|r| r.id != id);
                        MutationOp::Delete { id: remote_id }
                    } else {
                        if let Some(record) = records.iter_mut().find(|r| r.id == id) {
                            record.timeslots = remaining.clone();
                        }
                        MutationOp::Update {
                            id: remote_id,
                            payload: AvailabilityRecordUpdate {
                                timeslots: remaining,
                            },
                        }
                    }
                }
                None => {
                    // Set path: gated by the resolver's priority chain.
                    let state = st.context.resolve(scope.resource_id.as_deref(), date, slot);
                    if !state.allows_set(scope) {
                        return Ok(self.reject(&mut st, RejectReason::NotActionable(state)));
                    }

                    let temp_id = RecordId::new_temp();
                    let payload = AvailabilityRecordCreate {
                        date,
                        resource_id: scope.resource_id.clone(),
                        kind: scope.kind,
                        timeslots: [slot.to_string()].into(),
                        reason: None,
                        owner: self.owner.clone(),
                    };
                    st.context.records_mut(scope.kind).push(AvailabilityRecord {
                        id: temp_id.clone(),
                        date,
                        resource_id: scope.resource_id.clone(),
                        kind: scope.kind,
                        timeslots: [slot.to_string()].into(),
                        reason: None,
                        owner: self.owner.clone(),
                    });
                    MutationOp::Create { temp_id, payload }
                }
            };

            let seq = st.next_seq;
            st.next_seq += 1;
            st.slot_seq.insert(key.clone(), seq);
            st.loading.insert(key.clone());
            st.mutations
                .insert(key.clone(), MutationPhase::Applying { snapshot, seq });
            (op, seq, st.generation)
        };

        self.run_mutation(scope, key, op, seq, generation).await
    }

    fn reject(&self, st: &mut CoordinatorState, reason: RejectReason) -> ToggleOutcome {
        st.notifications.push(Notification {
            message: reason.message(),
            is_error: false,
        });
        tracing::debug!(?reason, "toggle rejected before dispatch");
        ToggleOutcome::Rejected(reason)
    }

    async fn run_mutation(
        &self,
        scope: &ToggleScope,
        key: SlotKey,
        op: MutationOp,
        seq: u64,
        generation: u64,
    ) -> ClientResult<ToggleOutcome> {
        let result = match &op {
            MutationOp::Create { payload, .. } => {
                self.api.create_record(payload).await.map(Some)
            }
            MutationOp::Update { id, payload } => {
                self.api.update_record(id, payload).await.map(Some)
            }
            MutationOp::Delete { id } => self.api.delete_record(id).await.map(|_| None),
        };

        let mut st = self.lock();
        st.loading.remove(&key);

        // Stale completion: the context was reloaded since dispatch or a
        // newer mutation owns this slot, so the result must not touch local
        // state either way.
        if st.generation != generation || st.slot_seq.get(&key) != Some(&seq) {
            tracing::debug!(slot = %key.slot, seq, "dropping stale mutation completion");
            return match result {
                Ok(_) => Ok(ToggleOutcome::Committed),
                Err(err) => {
                    st.notifications.push(Notification {
                        message: format!("Could not save the change: {err}"),
                        is_error: true,
                    });
                    Ok(ToggleOutcome::RolledBack)
                }
            };
        }

        match result {
            Ok(server_record) => {
                if let (MutationOp::Create { temp_id, .. }, Some(confirmed)) =
                    (&op, server_record)
                {
                    // Adopt the server id; the optimistic slot set stays
                    // authoritative until the next full reload.
                    let records = st.context.records_mut(scope.kind);
                    if let Some(record) = records.iter_mut().find(|r| r.id == *temp_id) {
                        record.id = confirmed.id;
                    }
                }
                st.mutations.insert(key.clone(), MutationPhase::Committed { seq });
                tracing::debug!(slot = %key.slot, date = %key.date, "mutation committed");
                Ok(ToggleOutcome::Committed)
            }
            Err(err) => {
                let snapshot = match st.mutations.get(&key) {
                    Some(MutationPhase::Applying { snapshot, .. }) => snapshot.clone(),
                    _ => None,
                };
                // Revert only the touched record; records committed for
                // other slots in the meantime are kept.
                let touched = op.touched_id();
                let records = st.context.records_mut(scope.kind);
                records.retain(|r| r.id != touched);
                if let Some(record) = snapshot.clone() {
                    records.push(record);
                }
                st.mutations
                    .insert(key.clone(), MutationPhase::RolledBack { snapshot, seq });
                st.notifications.push(Notification {
                    message: format!("Could not save the change: {err}"),
                    is_error: true,
                });
                tracing::warn!(slot = %key.slot, date = %key.date, error = %err, "mutation rolled back");
                Ok(ToggleOutcome::RolledBack)
            }
        }
    }
}
