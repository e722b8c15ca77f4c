//! Constraints

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{cart::CartLine, products::ProductId, weight::Weight};

/// Input contract violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstraintError {
    /// The budget is below zero.
    #[error("budget cannot be negative: {0} minor units")]
    NegativeBudget(i64),

    /// A product is priced below zero.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// A product's currency differs from the budget currency (product, product currency, budget currency).
    #[error("product {0} has currency {1}, but the budget is in {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),
}

/// Budget and weight ceilings for one optimisation.
///
/// Either ceiling may be zero, in which case nothing priced or weighted can be
/// selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints<'a> {
    budget: Money<'a, Currency>,
    weight_limit: Weight,
}

impl<'a> Constraints<'a> {
    /// Create a constraint set.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::NegativeBudget`] if `budget` is below zero.
    pub fn new(budget: Money<'a, Currency>, weight_limit: Weight) -> Result<Self, ConstraintError> {
        let minor = budget.to_minor_units();

        if minor < 0 {
            return Err(ConstraintError::NegativeBudget(minor));
        }

        Ok(Constraints {
            budget,
            weight_limit,
        })
    }

    /// Spending ceiling.
    pub fn budget(&self) -> Money<'a, Currency> {
        self.budget
    }

    /// Spending ceiling in minor units.
    pub fn budget_minor(&self) -> i64 {
        self.budget.to_minor_units()
    }

    /// Weight ceiling.
    pub fn weight_limit(&self) -> Weight {
        self.weight_limit
    }

    /// Currency of the budget.
    pub fn currency(&self) -> &'a Currency {
        self.budget.currency()
    }

    /// Check that every line is priced non-negatively in the budget currency.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConstraintError`] found, in line order.
    pub fn check_lines(&self, lines: &[CartLine<'_>]) -> Result<(), ConstraintError> {
        let currency = self.currency();

        lines.iter().try_for_each(|line| {
            let product = line.product();
            let product_currency = product.price.currency();

            if product_currency != currency {
                return Err(ConstraintError::CurrencyMismatch(
                    product.id,
                    product_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if product.price.to_minor_units() < 0 {
                return Err(ConstraintError::NegativePrice(product.id));
            }

            Ok(())
        })
    }
}
