//! Arrival and admission worker loops
//!
//! Workers are tight polling loops over the non-blocking door and controller
//! operations. Both roles are level-triggered on the shared counter: once a
//! worker observes that capacity is exhausted (or the cooperative cancel flag
//! is raised) it stops and releases its completion token exactly once.

use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{debug, error};

use crate::admission::{AdmissionController, AdmissionRecord, Door};
use crate::simulation::CompletionToken;
use crate::visitor::VisitorSource;

/// Produces visitors into door queues until capacity is exhausted
///
/// With a single door the worker is dedicated to it; with several doors it
/// picks a random door per iteration (the shared-pool topology).
pub(crate) struct ArrivalWorker {
    doors: Vec<Arc<Door>>,
    controller: Arc<AdmissionController>,
    source: Box<dyn VisitorSource>,
    cancel: Arc<AtomicBool>,
    echo: bool,
    rng: rand::rngs::StdRng,
    token: CompletionToken,
}

impl ArrivalWorker {
    /// Create an arrival worker over the given doors
    pub(crate) fn new(
        doors: Vec<Arc<Door>>,
        controller: Arc<AdmissionController>,
        source: Box<dyn VisitorSource>,
        cancel: Arc<AtomicBool>,
        echo: bool,
        seed: Option<u64>,
        token: CompletionToken,
    ) -> Self {
        use rand::SeedableRng;
        let rng = match seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        };
        Self { doors, controller, source, cancel, echo, rng, token }
    }

    /// Run the worker loop to completion
    ///
    /// A supplier failure is fatal to this worker only: it is logged here at
    /// the worker boundary and never propagated. The completion token is
    /// released on every exit path.
    pub(crate) fn run(mut self) {
        while !self.cancel.load(Ordering::Acquire) && !self.controller.is_exhausted() {
            let door = self.pick_door();
            match self.source.next_visitor() {
                Ok(visitor) => {
                    let id = visitor.id;
                    door.arrive(visitor);
                    debug!(visitor = %id, door = door.name(), "visitor arrived");
                    if self.echo {
                        println!("{} arrives at door {}", id, door.name());
                    }
                }
                Err(source_error) => {
                    error!(
                        door = door.name(),
                        error = %source_error,
                        "visitor source failed, stopping this arrival worker"
                    );
                    break;
                }
            }
            thread::yield_now();
        }
        self.token.complete();
    }

    fn pick_door(&mut self) -> Arc<Door> {
        if self.doors.len() == 1 {
            Arc::clone(&self.doors[0])
        } else {
            let index = self.rng.gen_range(0..self.doors.len());
            Arc::clone(&self.doors[index])
        }
    }
}

/// Drains door queues under the shared capacity limit
///
/// Scans its doors in turn; a dedicated worker has exactly one. Every
/// granted admission is echoed and appended to the shared admission log.
pub(crate) struct AdmissionWorker {
    doors: Vec<Arc<Door>>,
    controller: Arc<AdmissionController>,
    cancel: Arc<AtomicBool>,
    echo: bool,
    log: Arc<Mutex<Vec<AdmissionRecord>>>,
    token: CompletionToken,
}

impl AdmissionWorker {
    /// Create an admission worker over the given doors
    pub(crate) fn new(
        doors: Vec<Arc<Door>>,
        controller: Arc<AdmissionController>,
        cancel: Arc<AtomicBool>,
        echo: bool,
        log: Arc<Mutex<Vec<AdmissionRecord>>>,
        token: CompletionToken,
    ) -> Self {
        Self { doors, controller, cancel, echo, log, token }
    }

    /// Run the worker loop to completion
    pub(crate) fn run(self) {
        while !self.cancel.load(Ordering::Acquire) && !self.controller.is_exhausted() {
            let mut admitted_any = false;
            for door in &self.doors {
                if let Some(record) = door.try_admit_one(&self.controller) {
                    debug!(
                        visitor = %record.visitor.id,
                        door = %record.door_name,
                        sequence = record.sequence,
                        "visitor admitted"
                    );
                    if self.echo {
                        println!("{}", record);
                    }
                    self.log
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .push(record);
                    admitted_any = true;
                }
            }
            if !admitted_any {
                thread::yield_now();
            }
        }
        self.token.complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::CompletionLatch;
    use crate::types::Sex;
    use crate::visitor::{Visitor, VisitorGenerator};
    use std::time::Duration;

    /// Supplier that succeeds a fixed number of times, then fails
    struct FlakySource {
        remaining: usize,
    }

    impl VisitorSource for FlakySource {
        fn next_visitor(&mut self) -> anyhow::Result<Visitor> {
            if self.remaining == 0 {
                anyhow::bail!("supplier exhausted");
            }
            self.remaining -= 1;
            Ok(Visitor::new(Sex::Female, 30))
        }
    }

    fn worker_parts(
        capacity: u64,
    ) -> (Vec<Arc<Door>>, Arc<AdmissionController>, Arc<AtomicBool>) {
        (
            vec![Arc::new(Door::new("EAST"))],
            Arc::new(AdmissionController::new(capacity)),
            Arc::new(AtomicBool::new(false)),
        )
    }

    #[test]
    fn test_arrival_worker_stops_on_exhausted_capacity() {
        let (doors, controller, cancel) = worker_parts(0);
        let (latch, mut tokens) = CompletionLatch::new(1);

        let worker = ArrivalWorker::new(
            doors.clone(),
            controller,
            Box::new(VisitorGenerator::with_seed(1)),
            cancel,
            false,
            Some(1),
            tokens.pop().unwrap(),
        );
        worker.run();

        assert!(latch.wait_timeout(Duration::from_secs(1)));
        assert_eq!(doors[0].total_arrivals(), 0);
    }

    #[test]
    fn test_arrival_worker_stops_on_cancel() {
        let (doors, controller, cancel) = worker_parts(100);
        cancel.store(true, Ordering::Release);
        let (latch, mut tokens) = CompletionLatch::new(1);

        ArrivalWorker::new(
            doors.clone(),
            controller,
            Box::new(VisitorGenerator::with_seed(1)),
            cancel,
            false,
            Some(1),
            tokens.pop().unwrap(),
        )
        .run();

        assert!(latch.wait_timeout(Duration::from_secs(1)));
        assert_eq!(doors[0].total_arrivals(), 0);
    }

    #[test]
    fn test_failing_source_stops_only_this_worker() {
        let (doors, controller, cancel) = worker_parts(100);
        let (latch, mut tokens) = CompletionLatch::new(1);

        ArrivalWorker::new(
            doors.clone(),
            Arc::clone(&controller),
            Box::new(FlakySource { remaining: 3 }),
            Arc::clone(&cancel),
            false,
            None,
            tokens.pop().unwrap(),
        )
        .run();

        // Worker stopped after three successes and still signalled completion.
        assert!(latch.wait_timeout(Duration::from_secs(1)));
        assert_eq!(doors[0].total_arrivals(), 3);
        // Shared state is untouched by the failure; admissions still work.
        assert!(doors[0].try_admit_one(&controller).is_some());
    }

    #[test]
    fn test_admission_worker_drains_until_capacity() {
        let (doors, controller, cancel) = worker_parts(2);
        for _ in 0..5 {
            doors[0].arrive(Visitor::new(Sex::Male, 20));
        }
        let (latch, mut tokens) = CompletionLatch::new(1);
        let log = Arc::new(Mutex::new(Vec::new()));

        AdmissionWorker::new(
            doors.clone(),
            Arc::clone(&controller),
            cancel,
            false,
            Arc::clone(&log),
            tokens.pop().unwrap(),
        )
        .run();

        assert!(latch.wait_timeout(Duration::from_secs(1)));
        assert_eq!(log.lock().unwrap().len(), 2);
        assert_eq!(doors[0].waiting_count(), 3);
        assert!(controller.is_exhausted());
    }

    #[test]
    fn test_arrival_and_admission_workers_cooperate() {
        let (doors, controller, cancel) = worker_parts(10);
        let (latch, mut tokens) = CompletionLatch::new(2);
        let log = Arc::new(Mutex::new(Vec::new()));

        let arrival = ArrivalWorker::new(
            doors.clone(),
            Arc::clone(&controller),
            Box::new(VisitorGenerator::with_seed(7)),
            Arc::clone(&cancel),
            false,
            Some(7),
            tokens.pop().unwrap(),
        );
        let admission = AdmissionWorker::new(
            doors.clone(),
            Arc::clone(&controller),
            Arc::clone(&cancel),
            false,
            Arc::clone(&log),
            tokens.pop().unwrap(),
        );

        let arrival_handle = thread::spawn(move || arrival.run());
        let admission_handle = thread::spawn(move || admission.run());

        assert!(latch.wait_timeout(Duration::from_secs(10)), "workers never terminated");
        arrival_handle.join().unwrap();
        admission_handle.join().unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 10);
        let mut sequences: Vec<_> = log.iter().map(|r| r.sequence).collect();
        sequences.sort_unstable();
        assert_eq!(sequences, (1..=10).collect::<Vec<_>>());
    }
}
