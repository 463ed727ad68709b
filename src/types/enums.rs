//! Enumeration types for the park admission simulator
//!
//! This module contains the enumeration types used throughout the simulation
//! system: the visitor attribute set and the worker topology selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recorded sex of a generated visitor
///
/// Drawn uniformly by the visitor generator; carried on the visitor record
/// but never consulted by the admission protocol itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Female visitor
    Female,
    /// Male visitor
    Male,
}

impl Sex {
    /// All variants, used for uniform draws by the generator
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Female => write!(f, "Female"),
            Sex::Male => write!(f, "Male"),
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "female" | "f" => Ok(Sex::Female),
            "male" | "m" => Ok(Sex::Male),
            _ => Err(format!("Unknown sex: {}", s)),
        }
    }
}

/// Worker topology for the simulation
///
/// Both topologies implement the same admission protocol; they differ only in
/// how worker threads are mapped onto doors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerTopology {
    /// One dedicated arrival worker and one dedicated admission worker per door
    DedicatedPerDoor,
    /// A shared pool of workers, each serving every door: arrivals pick a
    /// random door per iteration, admissions scan all doors in turn
    SharedPool {
        /// Number of arrival workers and number of admission workers
        /// (the pool spawns `workers` of each role)
        workers: usize,
    },
}

impl Default for WorkerTopology {
    fn default() -> Self {
        WorkerTopology::DedicatedPerDoor
    }
}

impl fmt::Display for WorkerTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerTopology::DedicatedPerDoor => write!(f, "dedicated-per-door"),
            WorkerTopology::SharedPool { workers } => {
                write!(f, "shared-pool({} workers)", workers)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_parsing() {
        assert_eq!("female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("M".parse::<Sex>().unwrap(), Sex::Male);
        assert!("other".parse::<Sex>().is_err());
    }

    #[test]
    fn test_sex_all_covers_every_variant() {
        assert_eq!(Sex::ALL.len(), 2);
        assert!(Sex::ALL.contains(&Sex::Female));
        assert!(Sex::ALL.contains(&Sex::Male));
    }

    #[test]
    fn test_topology_display() {
        assert_eq!(WorkerTopology::DedicatedPerDoor.to_string(), "dedicated-per-door");
        assert_eq!(
            WorkerTopology::SharedPool { workers: 2 }.to_string(),
            "shared-pool(2 workers)"
        );
    }

    #[test]
    fn test_topology_default() {
        assert_eq!(WorkerTopology::default(), WorkerTopology::DedicatedPerDoor);
    }
}
