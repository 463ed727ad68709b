//! The door: one arrival queue plus the admission protocol
//!
//! A door owns a FIFO queue of waiting visitors, mutated concurrently by the
//! arrival path (append at tail) and the admission path (remove from head).
//! The queue is guarded by a mutex; the shared capacity counter lives in the
//! [`AdmissionController`] and is passed in explicitly.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::admission::{AdmissionController, AdmissionRecord, DoorSnapshot};
use crate::visitor::Visitor;

/// An independent arrival point holding a FIFO queue of waiting visitors
#[derive(Debug)]
pub struct Door {
    /// Immutable door name
    name: String,
    /// Waiting visitors, head = next to be admitted
    queue: Mutex<VecDeque<Visitor>>,
    /// Total arrivals ever accepted at this door
    total_arrivals: AtomicU64,
}

impl Door {
    /// Create a door with an empty queue
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queue: Mutex::new(VecDeque::new()),
            total_arrivals: AtomicU64::new(0),
        }
    }

    /// The door's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a visitor to the tail of the queue
    ///
    /// Never blocks beyond the queue mutex and never fails; the queue is
    /// unbounded.
    pub fn arrive(&self, visitor: Visitor) {
        self.lock_queue().push_back(visitor);
        self.total_arrivals.fetch_add(1, Ordering::Relaxed);
    }

    /// True iff the queue is non-empty at the instant of the call
    ///
    /// The answer may be stale with respect to concurrent `arrive` or
    /// `try_admit_one` calls; callers use it only as a polling hint.
    pub fn has_waiting(&self) -> bool {
        !self.lock_queue().is_empty()
    }

    /// Number of visitors currently waiting (instantaneous, may be stale)
    pub fn waiting_count(&self) -> usize {
        self.lock_queue().len()
    }

    /// Total arrivals ever accepted at this door
    pub fn total_arrivals(&self) -> u64 {
        self.total_arrivals.load(Ordering::Relaxed)
    }

    /// Attempt to admit the visitor at the head of the queue
    ///
    /// The reservation is requested while the queue lock is held and only
    /// after confirming the queue is non-empty, so the global counter can
    /// never advance without a corresponding real dequeue, and the head
    /// cannot be stolen between the reservation and the pop. Returns `None`
    /// when the queue is empty or capacity is exhausted; in both cases the
    /// counter is untouched.
    pub fn try_admit_one(&self, controller: &AdmissionController) -> Option<AdmissionRecord> {
        let mut queue = self.lock_queue();
        if queue.is_empty() {
            return None;
        }
        let sequence = controller.try_reserve()?;
        // Non-empty was checked under the same lock, so the pop must succeed.
        let visitor = queue
            .pop_front()
            .unwrap_or_else(|| unreachable!("queue emptied while locked"));
        drop(queue);
        Some(AdmissionRecord::new(visitor, self.name.clone(), sequence))
    }

    /// Take a read-only snapshot of the door's residual state
    ///
    /// Intended for use after all workers are cancelled, at which point no
    /// further mutation occurs and the snapshot is exact; under concurrent
    /// mutation it is a best-effort instant view.
    pub fn snapshot(&self) -> DoorSnapshot {
        let queue = self.lock_queue();
        DoorSnapshot {
            door_name: self.name.clone(),
            total_arrivals: self.total_arrivals.load(Ordering::Relaxed),
            waiting_count: queue.len(),
            waiting_ids: queue.iter().map(|v| v.id).collect(),
        }
    }

    /// Lock the queue, recovering from poisoning
    ///
    /// A worker panicking mid-operation must not take the whole door down
    /// with it; the queue contents stay structurally valid either way.
    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<Visitor>> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sex;
    use std::sync::Arc;
    use std::thread;

    fn visitor() -> Visitor {
        Visitor::new(Sex::Female, 25)
    }

    #[test]
    fn test_arrive_grows_queue() {
        let door = Door::new("EAST");
        assert!(!door.has_waiting());
        door.arrive(visitor());
        assert!(door.has_waiting());
        assert_eq!(door.waiting_count(), 1);
        assert_eq!(door.total_arrivals(), 1);
    }

    #[test]
    fn test_admission_is_fifo() {
        let door = Door::new("EAST");
        let controller = AdmissionController::new(10);
        let first = visitor();
        let second = visitor();
        door.arrive(first.clone());
        door.arrive(second.clone());

        let a = door.try_admit_one(&controller).unwrap();
        let b = door.try_admit_one(&controller).unwrap();
        assert_eq!(a.visitor.id, first.id);
        assert_eq!(b.visitor.id, second.id);
        assert_eq!(a.sequence, 1);
        assert_eq!(b.sequence, 2);
    }

    #[test]
    fn test_empty_queue_does_not_consume_capacity() {
        let door = Door::new("EAST");
        let controller = AdmissionController::new(1);
        assert!(door.try_admit_one(&controller).is_none());
        // Counter must be untouched by the phantom attempt.
        assert_eq!(controller.remaining(), 1);
    }

    #[test]
    fn test_exhausted_capacity_leaves_queue_intact() {
        let door = Door::new("EAST");
        let controller = AdmissionController::new(1);
        door.arrive(visitor());
        door.arrive(visitor());

        assert!(door.try_admit_one(&controller).is_some());
        assert!(door.try_admit_one(&controller).is_none());
        assert_eq!(door.waiting_count(), 1);
        assert_eq!(controller.admitted(), 1);
    }

    #[test]
    fn test_snapshot_lists_waiting_in_arrival_order() {
        let door = Door::new("WEST");
        let ids: Vec<_> = (0..4)
            .map(|_| {
                let v = visitor();
                let id = v.id;
                door.arrive(v);
                id
            })
            .collect();

        let snapshot = door.snapshot();
        assert_eq!(snapshot.door_name, "WEST");
        assert_eq!(snapshot.total_arrivals, 4);
        assert_eq!(snapshot.waiting_count, 4);
        assert_eq!(snapshot.waiting_ids, ids);
    }

    #[test]
    fn test_concurrent_producers_and_consumers_lose_nothing() {
        let door = Arc::new(Door::new("NORTH"));
        let controller = Arc::new(AdmissionController::new(u64::MAX));
        let per_thread = 500;
        let producers = 4;

        let producer_handles: Vec<_> = (0..producers)
            .map(|_| {
                let door = Arc::clone(&door);
                thread::spawn(move || {
                    for _ in 0..per_thread {
                        door.arrive(Visitor::new(Sex::Male, 30));
                    }
                })
            })
            .collect();

        let consumer_handles: Vec<_> = (0..2)
            .map(|_| {
                let door = Arc::clone(&door);
                let controller = Arc::clone(&controller);
                thread::spawn(move || {
                    let mut admitted = Vec::new();
                    // Drain until producers are done and the queue is empty;
                    // 2000 consecutive misses is comfortably past the end.
                    let mut misses = 0;
                    while misses < 2000 {
                        match door.try_admit_one(&controller) {
                            Some(record) => {
                                admitted.push(record.visitor.id);
                                misses = 0;
                            }
                            None => {
                                misses += 1;
                                thread::yield_now();
                            }
                        }
                    }
                    admitted
                })
            })
            .collect();

        for handle in producer_handles {
            handle.join().unwrap();
        }
        let mut seen: Vec<_> = consumer_handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        seen.extend(door.snapshot().waiting_ids);

        let total = producers * per_thread;
        assert_eq!(seen.len(), total);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total, "a visitor was lost or duplicated");
    }
}
