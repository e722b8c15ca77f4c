//! Knapsack optimiser
//!
//! Picks the value-maximising subset of a cart's units under a budget and a
//! weight limit. Small problems are solved exactly with the bounded dynamic
//! program; carts with too many units, or budgets that are too large, fall
//! back to the greedy heuristic.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::{CartError, CartLine},
    config::OptimiserConfig,
    constraints::{ConstraintError, Constraints},
    solvers::{
        Method, Selection, Solver, SolverError, dynamic::DynamicSolver, greedy::GreedySolver,
    },
    units::{self, assemble},
    weight::Weight,
};

/// Errors returned by [`optimise`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptimiseError {
    /// The inputs break the optimiser's contract.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// A solver reported an internal failure.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// The selection could not be turned back into cart lines.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Selected lines and their exact aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackResult<'a> {
    lines: SmallVec<[CartLine<'a>; 10]>,
    total_value: u32,
    total_weight: Weight,
    total_price: Money<'a, Currency>,
    method: Method,
}

impl<'a> KnapsackResult<'a> {
    /// The zero result: nothing selected.
    pub fn empty(currency: &'a Currency, method: Method) -> Self {
        KnapsackResult {
            lines: SmallVec::new(),
            total_value: 0,
            total_weight: Weight::ZERO,
            total_price: Money::from_minor(0, currency),
            method,
        }
    }

    /// Selected lines, one per product, in first-appearance order.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Sum of value scores of the selected units.
    pub fn total_value(&self) -> u32 {
        self.total_value
    }

    /// Weight of the selected units.
    pub fn total_weight(&self) -> Weight {
        self.total_weight
    }

    /// Price of the selected units.
    pub fn total_price(&self) -> Money<'a, Currency> {
        self.total_price
    }

    /// Which method produced the selection.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Select the most valuable units of `lines` that fit `constraints`.
///
/// An empty cart returns the zero result without running a solver. Results
/// are deterministic for identical inputs.
///
/// # Errors
///
/// Returns an [`OptimiseError`] if a line is priced negatively or in a
/// currency other than the budget's, or if a solver breaks an internal
/// invariant.
#[tracing::instrument(
    name = "optimise",
    skip_all,
    fields(
        lines = lines.len(),
        budget_minor = constraints.budget_minor(),
        weight_limit_grams = constraints.weight_limit().grams(),
    )
)]
pub fn optimise<'a>(
    lines: &[CartLine<'a>],
    constraints: &Constraints<'a>,
    config: &OptimiserConfig,
) -> Result<KnapsackResult<'a>, OptimiseError> {
    constraints.check_lines(lines)?;

    if lines.is_empty() {
        return Ok(KnapsackResult::empty(
            constraints.currency(),
            Method::EmptyCart,
        ));
    }

    let unit_count: u64 = lines.iter().map(|line| u64::from(line.quantity())).sum();
    let budget = constraints.budget();

    let (method, selection) = if config.exceeds_exact_limits(unit_count, &budget) {
        info!(units = unit_count, "problem too large for exact solve, using greedy heuristic");

        run::<GreedySolver>(lines, constraints, config)?
    } else {
        run::<DynamicSolver>(lines, constraints, config)?
    };

    let selected = assemble(lines, &selection)?;
    let totals = units::totals(&selected);

    debug!(
        %method,
        value = totals.value,
        price_minor = totals.price_minor,
        grams = totals.weight.grams(),
        "selection assembled"
    );

    if totals.price_minor > constraints.budget_minor() || totals.weight > constraints.weight_limit() {
        return Err(OptimiseError::Solver(SolverError::InvariantViolation {
            message: "selection exceeds budget or weight limit",
        }));
    }

    Ok(KnapsackResult {
        lines: selected,
        total_value: totals.value,
        total_weight: totals.weight,
        total_price: Money::from_minor(totals.price_minor, constraints.currency()),
        method,
    })
}

fn run<S: Solver>(
    lines: &[CartLine<'_>],
    constraints: &Constraints<'_>,
    config: &OptimiserConfig,
) -> Result<(Method, Selection), SolverError> {
    debug!(method = %S::METHOD, "dispatching solver");

    Ok((S::METHOD, S::solve(lines, constraints, config)?))
}
