//! Park Admission Simulator
//!
//! A concurrent admission-control simulation: visitors arrive at several
//! independent park doors, each holding a FIFO queue, while admission workers
//! drain the queues under a single global capacity limit shared across all
//! doors.
//!
//! # Overview
//!
//! The hard problem this crate models is correct, lock-light coordination of
//! multiple producers and multiple consumers against one shared counter:
//!
//! - **Race-free reservations**: the global counter advances only through a
//!   single atomic check-and-increment, and never without a real admission
//! - **Deterministic termination**: all workers stop once the limit is
//!   reached, via two completion latches and a cooperative cancel flag
//! - **Consistent shutdown snapshot**: who is still waiting at each door is
//!   reported only after every worker has been joined
//!
//! # Quick Start
//!
//! ```rust
//! use park_admission_simulator::simulation::Simulation;
//! use park_admission_simulator::types::SimulationConfig;
//!
//! let config = SimulationConfig::default()
//!     .with_capacity(10)
//!     .without_echo();
//!
//! let report = Simulation::new(config).unwrap().run().unwrap();
//! assert_eq!(report.total_admitted, 10);
//! for line in report.waiting_report_lines() {
//!     println!("{}", line);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`types`]: identifiers, enums and configuration
//! - [`visitor`]: the immutable visitor entity and its pluggable supplier
//! - [`admission`]: the door queues and the shared-capacity protocol
//! - [`simulation`]: orchestration, workers, shutdown handshake, logging,
//!   errors
//!
//! # Ordering guarantees
//!
//! Within a single door, admission order equals arrival order (the queue is
//! FIFO). Across doors there is no ordering guarantee: a slot goes to
//! whichever door's worker wins the reservation race. Sequence numbers form
//! a total order system-wide, but that order does not correlate with arrival
//! time across doors.
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod admission;
pub mod simulation;
pub mod types;
pub mod visitor;

// Core types and identifiers
pub use types::{
    CliArgs,
    ConfigValidationError,
    Sex,
    SimulationConfig,
    VisitorId,
    WorkerTopology,
};

// Visitor modeling
pub use visitor::{Visitor, VisitorGenerator, VisitorSource};

// Admission protocol
pub use admission::{AdmissionController, AdmissionRecord, Door, DoorSnapshot};

// Simulation orchestration
pub use simulation::{
    CompletionLatch, CompletionToken, LoggingConfig, Simulation, SimulationError,
    SimulationReport, SimulationResult,
};
