//! Visitor modeling and generation
//!
//! This module contains the immutable visitor entity and the pluggable
//! supplier that arrival workers draw visitors from.

pub mod generator;
#[allow(clippy::module_inception)]
pub mod visitor;

// Re-export all public types for convenience
pub use generator::{VisitorGenerator, VisitorSource};
pub use visitor::Visitor;
