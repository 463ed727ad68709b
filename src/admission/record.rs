//! Admission records and door snapshots
//!
//! This module contains the data emitted by the admission protocol: one
//! record per granted admission, and one snapshot per door at shutdown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::VisitorId;
use crate::visitor::Visitor;

/// Record of one granted admission
///
/// Produced by [`Door::try_admit_one`](crate::admission::Door::try_admit_one)
/// after a successful reservation and dequeue. The sequence number is the
/// controller counter value at reservation time, unique system-wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRecord {
    /// The admitted visitor
    pub visitor: Visitor,
    /// Name of the door that admitted the visitor
    pub door_name: String,
    /// System-wide admission sequence number (1-based)
    pub sequence: u64,
    /// Timestamp taken when the admission was granted
    pub admitted_at: DateTime<Utc>,
}

impl AdmissionRecord {
    /// Create a record for an admission granted now
    pub fn new(visitor: Visitor, door_name: impl Into<String>, sequence: u64) -> Self {
        Self {
            visitor,
            door_name: door_name.into(),
            sequence,
            admitted_at: Utc::now(),
        }
    }
}

impl fmt::Display for AdmissionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} admitted at door {}, sequence {}",
            self.visitor.id, self.door_name, self.sequence
        )
    }
}

/// Read-only snapshot of one door's residual state
///
/// Taken after all workers are cancelled, at which point no further mutation
/// occurs and the snapshot is exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSnapshot {
    /// Name of the door
    pub door_name: String,
    /// Total number of arrivals this door ever accepted
    pub total_arrivals: u64,
    /// Number of visitors still waiting in the queue
    pub waiting_count: usize,
    /// Ids of the waiting visitors, in arrival order
    pub waiting_ids: Vec<VisitorId>,
}

impl DoorSnapshot {
    /// Comma-joined ids of the visitors still waiting, in arrival order
    pub fn joined_waiting_ids(&self) -> String {
        self.waiting_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DoorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} still waiting at door {}: {}",
            self.waiting_count,
            self.door_name,
            self.joined_waiting_ids()
        )
    }
}
