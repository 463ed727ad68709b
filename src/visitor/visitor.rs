//! The visitor entity
//!
//! A visitor is created once by a generator, enqueued at exactly one door and
//! removed from that queue at most once by an admission. It is never mutated
//! after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Sex, VisitorId};

/// A visitor waiting to be admitted to the park
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor {
    /// Unique identifier of this visitor
    pub id: VisitorId,
    /// Recorded sex, drawn uniformly at generation time
    pub sex: Sex,
    /// Age in years, drawn uniformly from 0..100
    pub age: u8,
    /// Timestamp taken when the visitor was generated
    pub arrived_at: DateTime<Utc>,
}

impl Visitor {
    /// Create a new visitor with the given attributes, stamped with the
    /// current time
    pub fn new(sex: Sex, age: u8) -> Self {
        Self {
            id: VisitorId::new(),
            sex,
            age,
            arrived_at: Utc::now(),
        }
    }
}
