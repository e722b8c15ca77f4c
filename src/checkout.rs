//! Checkout
//!
//! Runs a cart through the knapsack optimiser and then the coupon selector,
//! and reports what the shopper pays and saves.

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartLine},
    config::OptimiserConfig,
    constraints::Constraints,
    coupons::{Coupon, CouponError, calculate_savings, select_best},
    optimiser::{KnapsackResult, OptimiseError, optimise},
    pricing::TotalPriceError,
    solvers::Method,
    weight::Weight,
};

/// Errors from [`optimise_cart`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The knapsack optimiser rejected the input.
    #[error(transparent)]
    Optimise(#[from] OptimiseError),

    /// The coupon selector failed.
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// The original subtotal could not be computed.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Everything an optimisation pass produces.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisationResult<'a> {
    knapsack: KnapsackResult<'a>,
    applied_coupon: Option<Coupon<'a>>,
    discount: Money<'a, Currency>,
    final_amount: Money<'a, Currency>,
    savings: Money<'a, Currency>,
    original_subtotal: Money<'a, Currency>,
}

impl<'a> OptimisationResult<'a> {
    /// Selected lines.
    pub fn lines(&self) -> &[CartLine<'a>] {
        self.knapsack.lines()
    }

    /// Selected lines as an owned list.
    pub fn to_lines(&self) -> SmallVec<[CartLine<'a>; 10]> {
        self.knapsack.lines().iter().copied().collect()
    }

    /// Sum of value scores of the selection.
    pub fn total_value(&self) -> u32 {
        self.knapsack.total_value()
    }

    /// Weight of the selection.
    pub fn total_weight(&self) -> Weight {
        self.knapsack.total_weight()
    }

    /// Price of the selection before any coupon.
    pub fn total_price(&self) -> Money<'a, Currency> {
        self.knapsack.total_price()
    }

    /// Method that produced the selection.
    pub fn method(&self) -> Method {
        self.knapsack.method()
    }

    /// The coupon applied, if any.
    pub fn applied_coupon(&self) -> Option<&Coupon<'a>> {
        self.applied_coupon.as_ref()
    }

    /// Coupon discount.
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount payable.
    pub fn final_amount(&self) -> Money<'a, Currency> {
        self.final_amount
    }

    /// Original subtotal minus the amount payable.
    pub fn savings(&self) -> Money<'a, Currency> {
        self.savings
    }

    /// Price of the whole cart before optimisation.
    pub fn original_subtotal(&self) -> Money<'a, Currency> {
        self.original_subtotal
    }
}

/// Optimise `cart` under `constraints`, then apply the best of `coupons`.
///
/// # Errors
///
/// Returns a [`CheckoutError`] on invalid input or mixed currencies.
#[tracing::instrument(
    name = "optimise_cart",
    skip_all,
    fields(lines = cart.len(), coupons = coupons.len())
)]
pub fn optimise_cart<'a>(
    cart: &Cart<'a>,
    constraints: &Constraints<'a>,
    coupons: &[Coupon<'a>],
    config: &OptimiserConfig,
) -> Result<OptimisationResult<'a>, CheckoutError> {
    let original_subtotal = cart.subtotal()?;
    let knapsack = optimise(cart.lines(), constraints, config)?;
    let selection = select_best(coupons, knapsack.lines(), constraints.currency())?;

    let savings = calculate_savings(
        original_subtotal,
        knapsack.total_price(),
        selection.discount(),
    )?;

    info!(
        method = %knapsack.method(),
        value = knapsack.total_value(),
        coupon = selection.coupon().map(|c| c.code.as_str()),
        final_minor = selection.final_amount().to_minor_units(),
        savings_minor = savings.to_minor_units(),
        "cart optimised"
    );

    Ok(OptimisationResult {
        applied_coupon: selection.coupon().cloned(),
        discount: selection.discount(),
        final_amount: selection.final_amount(),
        savings,
        original_subtotal,
        knapsack,
    })
}
