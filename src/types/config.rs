//! Configuration structures for the park admission simulator
//!
//! This module contains the simulation configuration structure and validation
//! logic used to control the behavior of the simulation system, plus the
//! command line surface.

use super::WorkerTopology;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Default capacity limit when no argument is given
pub const DEFAULT_CAPACITY: u64 = 50;

/// Default door names, matching the four park entrances
pub const DEFAULT_DOOR_NAMES: [&str; 4] = ["EAST", "WEST", "SOUTH", "NORTH"];

/// Command line arguments structure
///
/// The CLI surface is deliberately minimal: a single optional positional
/// capacity argument. Everything else is configured through
/// [`SimulationConfig`] at the library level.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "park-admission-simulator",
    version,
    about = "Park Admission Simulator - concurrent doors draining into one shared capacity limit",
    long_about = "Simulates visitors arriving at several park doors while admission workers \
drain the door queues under a single global capacity limit. Runs until the limit is \
exhausted, then reports who is still waiting at each door.

EXAMPLES:
    # Run with the default capacity of 50
    park-admission-simulator

    # Admit at most 200 visitors across all doors
    park-admission-simulator 200"
)]
pub struct CliArgs {
    /// Global admission capacity (positive integer)
    #[arg(
        value_name = "CAPACITY",
        help = "Global admission capacity shared across all doors",
        long_help = "Maximum number of visitors admitted across all doors combined. \
Must be a positive integer. Default: 50"
    )]
    pub capacity: Option<u64>,
}

/// Errors produced by configuration validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    /// Capacity must be a positive integer
    #[error("capacity must be a positive integer, got {0}")]
    NonPositiveCapacity(u64),

    /// At least one door is required
    #[error("at least one door is required")]
    NoDoors,

    /// A door name may not be empty
    #[error("door names must be non-empty")]
    EmptyDoorName,

    /// Door names must be unique
    #[error("duplicate door name: {0}")]
    DuplicateDoorName(String),

    /// A shared pool needs at least one worker per role
    #[error("shared pool topology requires at least one worker")]
    EmptySharedPool,
}

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Global admission capacity shared across all doors
    pub capacity: u64,
    /// Names of the doors, one arrival queue each
    pub door_names: Vec<String>,
    /// How worker threads are mapped onto doors
    pub topology: WorkerTopology,
    /// Optional RNG seed for reproducible visitor attributes
    /// (per generator instance; thread interleaving stays nondeterministic)
    pub seed: Option<u64>,
    /// Whether arrival and admission events are echoed to stdout as they occur
    pub echo_events: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            door_names: DEFAULT_DOOR_NAMES.iter().map(|s| s.to_string()).collect(),
            topology: WorkerTopology::default(),
            seed: None,
            echo_events: true,
        }
    }
}

impl SimulationConfig {
    /// Build a configuration from parsed command line arguments
    pub fn from_cli_args(args: CliArgs) -> Self {
        Self {
            capacity: args.capacity.unwrap_or(DEFAULT_CAPACITY),
            ..Self::default()
        }
    }

    /// Validate the configuration
    ///
    /// Validation runs before any worker thread is started; a failure here
    /// terminates the process without touching any shared state.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.capacity == 0 {
            return Err(ConfigValidationError::NonPositiveCapacity(self.capacity));
        }

        if self.door_names.is_empty() {
            return Err(ConfigValidationError::NoDoors);
        }

        let mut seen = std::collections::HashSet::new();
        for name in &self.door_names {
            if name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyDoorName);
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigValidationError::DuplicateDoorName(name.clone()));
            }
        }

        if let WorkerTopology::SharedPool { workers } = self.topology {
            if workers == 0 {
                return Err(ConfigValidationError::EmptySharedPool);
            }
        }

        Ok(())
    }

    /// Set the capacity (builder style)
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the door names (builder style)
    pub fn with_door_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.door_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the worker topology (builder style)
    pub fn with_topology(mut self, topology: WorkerTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Set the RNG seed (builder style)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Disable per-event stdout echo (builder style, used by tests)
    pub fn without_echo(mut self) -> Self {
        self.echo_events = false;
        self
    }
}
