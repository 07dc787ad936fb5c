//! Conflict Reporter
//!
//! Aggregates server-computed conflict flags per resource for display.
//! No interval-overlap math happens here; the upstream flag is trusted.

use std::collections::BTreeMap;

use shared::Assignment;

/// Flagged assignments for one resource; empty means "Clear"
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictSummary {
    pub resource_id: String,
    pub flagged: Vec<Assignment>,
}

impl ConflictSummary {
    pub fn is_clear(&self) -> bool {
        self.flagged.is_empty()
    }
}

/// Groups conflict flags per resource
pub struct ConflictReporter;

impl ConflictReporter {
    /// Summarize every resource present in the assignment list
    ///
    /// Resources without flagged assignments still get an entry, so the
    /// view can render "Clear" rows. Sorted by resource id.
    pub fn summarize(assignments: &[Assignment]) -> Vec<ConflictSummary> {
        let mut grouped: BTreeMap<&str, Vec<Assignment>> = BTreeMap::new();
        for assignment in assignments {
            let flags = grouped.entry(&assignment.resource_id).or_default();
            if assignment.is_flagged() {
                flags.push(assignment.clone());
            }
        }
        grouped
            .into_iter()
            .map(|(resource_id, flagged)| ConflictSummary {
                resource_id: resource_id.to_string(),
                flagged,
            })
            .collect()
    }

    /// Summary for a single resource
    pub fn for_resource(resource_id: &str, assignments: &[Assignment]) -> ConflictSummary {
        ConflictSummary {
            resource_id: resource_id.to_string(),
            flagged: assignments
                .iter()
                .filter(|a| a.resource_id == resource_id && a.is_flagged())
                .cloned()
                .collect(),
        }
    }
}
