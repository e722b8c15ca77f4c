//! Solvers for the cart knapsack

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{cart::CartLine, config::OptimiserConfig, constraints::Constraints};

pub mod dynamic;
pub mod greedy;

/// Solver Errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolverError {
    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Which method produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Nothing to optimise; no solver ran.
    EmptyCart,

    /// Bounded dynamic program over expanded units.
    DynamicProgramming,

    /// Efficiency-ordered greedy heuristic.
    Greedy,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::EmptyCart => "empty cart",
            Method::DynamicProgramming => "dynamic programming",
            Method::Greedy => "greedy",
        })
    }
}

/// Units chosen from each input line, index-aligned with the solver input.
pub type Selection = SmallVec<[u32; 16]>;

/// Trait for selecting units from cart lines under a budget and weight limit
pub trait Solver {
    /// Method this solver implements.
    const METHOD: Method;

    /// Choose how many units of each line to keep.
    ///
    /// Implementations must never exceed the budget or the weight limit in
    /// exact minor units and grams.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if an internal invariant is violated.
    fn solve(
        lines: &[CartLine<'_>],
        constraints: &Constraints<'_>,
        config: &OptimiserConfig,
    ) -> Result<Selection, SolverError>;
}
