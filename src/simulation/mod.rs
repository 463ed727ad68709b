//! Simulation orchestration and control
//!
//! This module contains the main simulation orchestrator, the worker loops,
//! the shutdown latch, logging configuration and error handling.
//!
//! # Overview
//!
//! - **Simulation**: owns the doors, the shared controller and the worker
//!   thread lifecycle; acts as the shutdown observer
//! - **SimulationReport**: final snapshot of admissions and residual queues
//! - **CompletionLatch** / **CompletionToken**: the shutdown handshake
//! - **LoggingConfig**: tracing setup for the binary and tests
//! - **SimulationError**: error taxonomy for simulation operations
//!
//! # Usage Example
//!
//! ```rust
//! use park_admission_simulator::simulation::Simulation;
//! use park_admission_simulator::types::SimulationConfig;
//!
//! let config = SimulationConfig::default()
//!     .with_capacity(5)
//!     .without_echo();
//!
//! let report = Simulation::new(config).unwrap().run().unwrap();
//! assert_eq!(report.total_admitted, 5);
//! ```

pub mod error;
pub mod latch;
pub mod logging;
pub mod orchestrator;
pub(crate) mod workers;

// Re-export all public types for convenience
pub use error::{SimulationError, SimulationResult};
pub use latch::{CompletionLatch, CompletionToken};
pub use logging::LoggingConfig;
pub use orchestrator::{Simulation, SimulationReport};
