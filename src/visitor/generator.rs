//! Visitor generation
//!
//! This module contains the pluggable visitor supplier trait and the default
//! random generator. Arrival workers consume the supplier as an opaque
//! factory; a supplier failure is fatal to the calling worker only.

use rand::Rng;
use std::fmt;

use crate::types::Sex;
use crate::visitor::Visitor;

/// Upper bound (exclusive) for generated visitor ages
const MAX_AGE: u8 = 100;

/// A supplier of visitors for arrival workers
///
/// Implementations must be cheap to call in a tight loop. The default
/// implementation is [`VisitorGenerator`]; tests inject failing suppliers to
/// exercise worker-local failure handling.
pub trait VisitorSource: Send {
    /// Produce the next visitor
    ///
    /// The default generator never fails; an error from a custom supplier
    /// stops the calling arrival worker without affecting any other worker.
    fn next_visitor(&mut self) -> anyhow::Result<Visitor>;
}

/// Generator for creating visitors with uniformly random attributes
pub struct VisitorGenerator {
    rng: Box<dyn rand::RngCore + Send>,
}

impl fmt::Debug for VisitorGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitorGenerator").finish()
    }
}

impl VisitorGenerator {
    /// Create a new generator seeded from entropy
    pub fn new() -> Self {
        use rand::SeedableRng;
        Self { rng: Box::new(rand::rngs::StdRng::from_entropy()) }
    }

    /// Create a new generator with a specific seed for reproducible results
    ///
    /// Reproducibility is call-for-call per generator instance; when several
    /// seeded generators run on concurrent workers, the interleaving of their
    /// outputs across doors remains nondeterministic.
    pub fn with_seed(seed: u64) -> Self {
        use rand::SeedableRng;
        Self { rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)) }
    }
}

impl Default for VisitorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitorSource for VisitorGenerator {
    fn next_visitor(&mut self) -> anyhow::Result<Visitor> {
        let sex = Sex::ALL[self.rng.gen_range(0..Sex::ALL.len())];
        let age = self.rng.gen_range(0..MAX_AGE);
        Ok(Visitor::new(sex, age))
    }
}
