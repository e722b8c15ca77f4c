//! Coupons
//!
//! At most one coupon applies to a cart: the one giving the largest discount
//! on the cart subtotal. Ties keep the coupon that comes first.

use decimal_percentage::Percentage;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::CartLine,
    discounts::{DiscountError, capped_percent_off},
    pricing::{TotalPriceError, subtotal},
};

/// Errors raised while choosing a coupon.
#[derive(Debug, Error)]
pub enum CouponError {
    /// Subtotal could not be computed.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Discount arithmetic failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A percentage-off coupon with a spend threshold and a discount cap.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon<'a> {
    /// Catalogue identifier
    pub id: u32,

    /// Code shown to the shopper, e.g. `SAVE20`
    pub code: String,

    /// Smallest subtotal the coupon applies to
    pub min_cart_value: Money<'a, Currency>,

    /// Fraction of the subtotal taken off
    pub discount_percent: Percentage,

    /// Largest discount the coupon can give
    pub max_discount: Money<'a, Currency>,

    /// Free-text description
    pub description: String,
}

impl<'a> Coupon<'a> {
    /// Whether a cart with this subtotal qualifies.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the currencies differ.
    pub fn applies_to(&self, subtotal: &Money<'a, Currency>) -> Result<bool, MoneyError> {
        if self.min_cart_value.currency() != subtotal.currency() {
            return Err(MoneyError::CurrencyMismatch {
                expected: subtotal.currency().iso_alpha_code,
                actual: self.min_cart_value.currency().iso_alpha_code,
            });
        }

        Ok(self.min_cart_value.to_minor_units() <= subtotal.to_minor_units())
    }

    /// Discount this coupon gives on `subtotal`, zero if it does not apply.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponError`] on a currency mismatch or percentage overflow.
    pub fn discount_on(
        &self,
        subtotal: Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, CouponError> {
        if !self.applies_to(&subtotal)? {
            return Ok(Money::from_minor(0, subtotal.currency()));
        }

        Ok(capped_percent_off(
            &self.discount_percent,
            subtotal,
            self.max_discount,
        )?)
    }
}

/// Outcome of [`select_best`].
#[derive(Debug, Clone, PartialEq)]
pub struct CouponSelection<'c, 'a> {
    coupon: Option<&'c Coupon<'a>>,
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    final_amount: Money<'a, Currency>,
}

impl<'c, 'a> CouponSelection<'c, 'a> {
    /// No coupon: the full subtotal is payable.
    pub fn none(subtotal: Money<'a, Currency>) -> Self {
        CouponSelection {
            coupon: None,
            subtotal,
            discount: Money::from_minor(0, subtotal.currency()),
            final_amount: subtotal,
        }
    }

    /// The chosen coupon, if any qualified.
    pub fn coupon(&self) -> Option<&'c Coupon<'a>> {
        self.coupon
    }

    /// Subtotal the discount was computed on.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount taken off.
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Subtotal minus discount; never negative.
    pub fn final_amount(&self) -> Money<'a, Currency> {
        self.final_amount
    }
}

/// Pick the coupon giving the largest discount on the subtotal of `lines`.
///
/// # Errors
///
/// Returns a [`CouponError`] if a line or coupon is in a currency other than `currency`.
pub fn select_best<'c, 'a>(
    coupons: &'c [Coupon<'a>],
    lines: &[CartLine<'a>],
    currency: &'a Currency,
) -> Result<CouponSelection<'c, 'a>, CouponError> {
    select_for_subtotal(coupons, subtotal(lines, currency)?)
}

/// Pick the coupon giving the largest discount on `subtotal`.
///
/// Only a strictly larger discount replaces the current pick, so the first
/// of several equal coupons wins.
///
/// # Errors
///
/// Returns a [`CouponError`] if a coupon is in another currency.
pub fn select_for_subtotal<'c, 'a>(
    coupons: &'c [Coupon<'a>],
    subtotal: Money<'a, Currency>,
) -> Result<CouponSelection<'c, 'a>, CouponError> {
    let mut best = CouponSelection::none(subtotal);

    for coupon in coupons {
        if !coupon.applies_to(&subtotal)? {
            continue;
        }

        let discount = coupon.discount_on(subtotal)?;

        if discount.to_minor_units() > best.discount.to_minor_units() {
            best = CouponSelection {
                coupon: Some(coupon),
                subtotal,
                discount,
                final_amount: subtotal.sub(discount)?,
            };
        }
    }

    debug!(
        coupon = best.coupon.map(|c| c.code.as_str()),
        discount_minor = best.discount.to_minor_units(),
        "coupon selected"
    );

    Ok(best)
}

/// How much less was paid than the original cart's undiscounted price.
///
/// `original - (optimised - discount)`
///
/// # Errors
///
/// Returns a [`MoneyError`] if the currencies differ.
pub fn calculate_savings<'a>(
    original: Money<'a, Currency>,
    optimised: Money<'a, Currency>,
    discount: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, MoneyError> {
    original.sub(optimised.sub(discount)?)
}
