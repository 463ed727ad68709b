//! The shared admission controller
//!
//! A single atomic counter plus a fixed capacity limit, shared by every door.
//! The counter is mutated exclusively through [`AdmissionController::try_reserve`],
//! a single compare-and-swap step that is race-free under arbitrary concurrent
//! callers. Reads (`remaining`, `admitted`) may be stale with respect to
//! concurrent reservations.

use std::sync::atomic::{AtomicU64, Ordering};

/// Arbitrates how many visitors total may be admitted across all doors
///
/// The counter starts at 0 and increases monotonically; a successful
/// reservation yields the new counter value as the system-wide sequence
/// number. The counter never exceeds the capacity limit.
#[derive(Debug)]
pub struct AdmissionController {
    /// Number of admissions granted so far
    counter: AtomicU64,
    /// Fixed capacity limit, immutable after construction
    capacity: u64,
}

impl AdmissionController {
    /// Create a controller with the given capacity limit
    pub fn new(capacity: u64) -> Self {
        Self { counter: AtomicU64::new(0), capacity }
    }

    /// Atomically claim one unit of remaining capacity
    ///
    /// Returns `Some(sequence)` with the new counter value if the counter was
    /// below the capacity limit, or `None` without touching the counter if
    /// capacity is exhausted. Sequence numbers are unique and monotonically
    /// increasing across the whole system; their order does not correlate
    /// with arrival time across doors (first-claimed-wins).
    pub fn try_reserve(&self) -> Option<u64> {
        self.counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                if current < self.capacity {
                    Some(current + 1)
                } else {
                    None
                }
            })
            .ok()
            .map(|previous| previous + 1)
    }

    /// Remaining capacity, possibly stale under concurrent reservations
    pub fn remaining(&self) -> u64 {
        self.capacity.saturating_sub(self.counter.load(Ordering::Acquire))
    }

    /// Number of admissions granted so far, possibly stale
    pub fn admitted(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }

    /// The fixed capacity limit
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// True once every unit of capacity has been claimed
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}
