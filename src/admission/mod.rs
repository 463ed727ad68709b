//! The shared-capacity admission protocol
//!
//! This module contains the core of the simulator:
//!
//! - **AdmissionController**: the global atomic counter and capacity limit
//! - **Door**: one concurrent FIFO arrival queue plus the reserve-then-pop
//!   admission operation
//! - **AdmissionRecord** / **DoorSnapshot**: the data the protocol emits
//!
//! Admission order across doors is first-claimed-wins, not globally FIFO by
//! arrival time; within one door, admission order equals arrival order.

pub mod controller;
pub mod door;
pub mod record;

// Re-export all public types for convenience
pub use controller::AdmissionController;
pub use door::Door;
pub use record::{AdmissionRecord, DoorSnapshot};
