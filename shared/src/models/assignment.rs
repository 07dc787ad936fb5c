//! Assignment Model
//!
//! Technician/resource work assignments. `conflict_status` is computed
//! server-side and consumed as opaque data; this layer does no interval
//! math of its own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Work assignment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub resource_id: String,
    pub work_order_id: String,
    pub date: NaiveDate,
    /// Canonical "HH:MM" slot value
    pub time: String,
    /// Server-computed overlap flag; absent or "none" means no conflict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_status: Option<String>,
}

impl Assignment {
    /// Whether the server flagged this assignment as conflicting
    pub fn is_flagged(&self) -> bool {
        matches!(&self.conflict_status, Some(status) if status != "none")
    }
}
