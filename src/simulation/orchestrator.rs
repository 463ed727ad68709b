//! Main simulation orchestrator
//!
//! This module contains the [`Simulation`] entry point: it owns the doors,
//! the shared admission controller and the concurrency lifecycle of the
//! worker threads, including the shutdown handshake.
//!
//! The shutdown observer (the thread calling [`Simulation::run`]) blocks
//! until both completion latches have opened — "no more arrivals will be
//! accepted" and "admission limit reached" — then raises the cooperative
//! cancel flag, joins every worker and takes the final door snapshots. The
//! snapshots are exact because no worker mutates anything after the joins.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

use crate::admission::{AdmissionController, AdmissionRecord, Door, DoorSnapshot};
use crate::simulation::workers::{AdmissionWorker, ArrivalWorker};
use crate::simulation::{CompletionLatch, SimulationError, SimulationResult};
use crate::types::{SimulationConfig, WorkerTopology};
use crate::visitor::VisitorGenerator;

/// Outcome of a completed simulation run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// The configured capacity limit
    pub capacity: u64,
    /// Number of admissions granted; equals `capacity` whenever arrivals
    /// kept every door supplied
    pub total_admitted: u64,
    /// Every granted admission, in the order the workers logged them
    pub admissions: Vec<AdmissionRecord>,
    /// Residual state of every door at shutdown, in configuration order
    pub snapshots: Vec<DoorSnapshot>,
    /// Wall time from worker start to the final snapshot
    pub elapsed: Duration,
}

impl SimulationReport {
    /// Total visitors still waiting across all doors
    pub fn total_waiting(&self) -> usize {
        self.snapshots.iter().map(|s| s.waiting_count).sum()
    }

    /// The shutdown report, one line per door in configuration order
    pub fn waiting_report_lines(&self) -> Vec<String> {
        self.snapshots.iter().map(|s| s.to_string()).collect()
    }

    /// Export the admission log as JSON lines, one record per line
    pub fn admissions_jsonl(&self) -> SimulationResult<String> {
        let mut out = String::new();
        for record in &self.admissions {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Orchestrates doors, workers and the shutdown handshake
#[derive(Debug)]
pub struct Simulation {
    /// Configuration for this run
    config: SimulationConfig,
    /// The shared capacity counter, one per simulation
    controller: Arc<AdmissionController>,
    /// The doors, in configuration order
    doors: Vec<Arc<Door>>,
}

impl Simulation {
    /// Create a simulation from a validated configuration
    ///
    /// Validation failures surface here, before any worker thread exists.
    #[instrument(skip(config), fields(capacity = config.capacity, doors = config.door_names.len()))]
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;

        let controller = Arc::new(AdmissionController::new(config.capacity));
        let doors: Vec<Arc<Door>> = config
            .door_names
            .iter()
            .map(|name| Arc::new(Door::new(name.clone())))
            .collect();

        info!(
            capacity = config.capacity,
            doors = doors.len(),
            topology = %config.topology,
            "simulation initialized"
        );

        Ok(Self { config, controller, doors })
    }

    /// The shared admission controller
    pub fn controller(&self) -> &Arc<AdmissionController> {
        &self.controller
    }

    /// The doors, in configuration order
    pub fn doors(&self) -> &[Arc<Door>] {
        &self.doors
    }

    /// Run the simulation to completion and return the final report
    ///
    /// Spawns arrival and admission workers per the configured topology,
    /// then acts as the shutdown observer. Returns once capacity is
    /// exhausted, every worker has stopped and the snapshots are taken.
    pub fn run(self) -> SimulationResult<SimulationReport> {
        let start = Instant::now();
        let cancel = Arc::new(AtomicBool::new(false));
        let log: Arc<Mutex<Vec<AdmissionRecord>>> = Arc::new(Mutex::new(Vec::new()));

        let worker_count = match self.config.topology {
            WorkerTopology::DedicatedPerDoor => self.doors.len(),
            WorkerTopology::SharedPool { workers } => workers,
        };
        let (arrivals_done, arrival_tokens) = CompletionLatch::new(worker_count);
        let (admissions_done, admission_tokens) = CompletionLatch::new(worker_count);

        let mut handles: Vec<(String, JoinHandle<()>)> = Vec::new();

        for (index, token) in arrival_tokens.into_iter().enumerate() {
            let doors = match self.config.topology {
                WorkerTopology::DedicatedPerDoor => vec![Arc::clone(&self.doors[index])],
                WorkerTopology::SharedPool { .. } => self.doors.clone(),
            };
            let name = match self.config.topology {
                WorkerTopology::DedicatedPerDoor => {
                    format!("arrival-{}", doors[0].name())
                }
                WorkerTopology::SharedPool { .. } => format!("arrival-{}", index),
            };
            let seed = self.config.seed.map(|s| s.wrapping_add(index as u64));
            let source = Box::new(match seed {
                Some(seed) => VisitorGenerator::with_seed(seed),
                None => VisitorGenerator::new(),
            });
            let worker = ArrivalWorker::new(
                doors,
                Arc::clone(&self.controller),
                source,
                Arc::clone(&cancel),
                self.config.echo_events,
                seed,
                token,
            );
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || worker.run())?;
            handles.push((name, handle));
        }

        for (index, token) in admission_tokens.into_iter().enumerate() {
            let doors = match self.config.topology {
                WorkerTopology::DedicatedPerDoor => vec![Arc::clone(&self.doors[index])],
                WorkerTopology::SharedPool { .. } => self.doors.clone(),
            };
            let name = match self.config.topology {
                WorkerTopology::DedicatedPerDoor => {
                    format!("admission-{}", doors[0].name())
                }
                WorkerTopology::SharedPool { .. } => format!("admission-{}", index),
            };
            let worker = AdmissionWorker::new(
                doors,
                Arc::clone(&self.controller),
                Arc::clone(&cancel),
                self.config.echo_events,
                Arc::clone(&log),
                token,
            );
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || worker.run())?;
            handles.push((name, handle));
        }

        info!(workers = handles.len(), "workers started, observing shutdown conditions");

        // Shutdown handshake: both conditions must hold before cancelling,
        // so no admission worker is cancelled while capacity remains and the
        // snapshots reflect queues after arrivals have stopped.
        arrivals_done.wait();
        debug!("all arrival workers stopped");
        admissions_done.wait();
        debug!("all admission workers stopped");

        cancel.store(true, Ordering::Release);
        for (name, handle) in handles {
            handle
                .join()
                .map_err(|_| SimulationError::WorkerPanicked(name))?;
        }

        let snapshots: Vec<DoorSnapshot> =
            self.doors.iter().map(|door| door.snapshot()).collect();
        let admissions = Arc::try_unwrap(log)
            .map(|mutex| mutex.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner()))
            .unwrap_or_else(|shared| {
                shared
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .clone()
            });

        let report = SimulationReport {
            capacity: self.config.capacity,
            total_admitted: self.controller.admitted(),
            admissions,
            snapshots,
            elapsed: start.elapsed(),
        };

        info!(
            admitted = report.total_admitted,
            waiting = report.total_waiting(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "simulation complete"
        );

        Ok(report)
    }
}
