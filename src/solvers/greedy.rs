//! Greedy heuristic
//!
//! Units are ranked by value per unit of price and taken in that order while
//! they still fit; a unit that does not fit is never revisited.
//!
//! Every unit of a line has the same efficiency and the ranking is stable,
//! so a line's units sit next to each other in the ranked order. Once one of
//! them is skipped the running totals stop changing until the next line, so
//! the rest of that line is skipped too. That lets the heuristic take a whole
//! run of units per line at once instead of materialising every unit.

use std::cmp::Ordering;

use smallvec::{SmallVec, smallvec};
use tracing::debug;

use crate::{
    cart::CartLine,
    config::OptimiserConfig,
    constraints::Constraints,
    products::Product,
    solvers::{Method, Selection, Solver, SolverError},
};

/// Solver ranking units by value score per unit of price.
#[derive(Debug)]
pub struct GreedySolver;

impl Solver for GreedySolver {
    const METHOD: Method = Method::Greedy;

    fn solve(
        lines: &[CartLine<'_>],
        constraints: &Constraints<'_>,
        _config: &OptimiserConfig,
    ) -> Result<Selection, SolverError> {
        let mut ranked: SmallVec<[(usize, &CartLine<'_>); 16]> = lines.iter().enumerate().collect();

        // `sort_by` is stable: equal efficiencies keep cart order.
        ranked.sort_by(|(_, a), (_, b)| {
            Efficiency::of(b.product()).cmp(&Efficiency::of(a.product()))
        });

        let mut selection: Selection = smallvec![0; lines.len()];
        let mut remaining_budget = constraints.budget_minor();
        let mut remaining_weight = constraints.weight_limit().grams();

        for (idx, line) in ranked {
            let take = units_that_fit(line, remaining_budget, remaining_weight);

            if take == 0 {
                continue;
            }

            let product = line.product();

            remaining_budget -= product.price.to_minor_units() * i64::from(take);
            remaining_weight -= product.weight.grams() * u64::from(take);

            let slot = selection
                .get_mut(idx)
                .ok_or(SolverError::InvariantViolation {
                    message: "ranked line index outside selection",
                })?;

            *slot = take;
        }

        debug!(
            spent_minor = constraints.budget_minor() - remaining_budget,
            carried_grams = constraints.weight_limit().grams() - remaining_weight,
            "greedy selection complete"
        );

        Ok(selection)
    }
}

/// How many of `line`'s units fit in what is left of the budget and weight.
fn units_that_fit(line: &CartLine<'_>, remaining_budget: i64, remaining_weight: u64) -> u32 {
    let product = line.product();
    let mut take = u64::from(line.quantity());

    let price = product.price.to_minor_units();
    if price > 0 {
        let affordable = u64::try_from(remaining_budget / price).unwrap_or(0);
        take = take.min(affordable);
    }

    let grams = product.weight.grams();
    if grams > 0 {
        take = take.min(remaining_weight / grams);
    }

    u32::try_from(take).unwrap_or(0)
}

/// Value score per unit of price.
///
/// Free units rank above everything else; among themselves they tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Efficiency {
    value: u32,
    price_minor: i64,
}

impl Efficiency {
    /// Efficiency of one unit of `product`.
    pub fn of(product: &Product<'_>) -> Self {
        Efficiency {
            value: u32::from(product.value_score.get()),
            price_minor: product.price.to_minor_units().max(0),
        }
    }

    /// Whether this unit costs nothing.
    pub fn is_infinite(&self) -> bool {
        self.price_minor == 0
    }
}

impl Ord for Efficiency {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            // a/p < b/q  <=>  a*q < b*p, for positive prices
            (false, false) => {
                let lhs = i128::from(self.value) * i128::from(other.price_minor);
                let rhs = i128::from(other.value) * i128::from(self.price_minor);

                lhs.cmp(&rhs)
            }
        }
    }
}

impl PartialOrd for Efficiency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
