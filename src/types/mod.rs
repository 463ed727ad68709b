//! Core types for the park admission simulator
//!
//! This module contains the identifier, enumeration and configuration types
//! shared across the simulation system.

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::{CliArgs, ConfigValidationError, SimulationConfig, DEFAULT_CAPACITY, DEFAULT_DOOR_NAMES};
pub use enums::{Sex, WorkerTopology};
pub use identifiers::VisitorId;
