//! Discount arithmetic
//!
//! Percentages are fractional (`0.2` is 20%) and applied to amounts in minor
//! units, rounding half away from zero.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// `percent` of `minor`, rounded to a whole minor unit.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the result does not fit in an `i64`.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    // decimal_percentage only exposes its value through arithmetic
    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// `percent` of `amount`, capped at `cap` and never more than `amount` itself.
///
/// # Errors
///
/// Returns a [`DiscountError`] if the percentage overflows or the currencies differ.
pub fn capped_percent_off<'a>(
    percent: &Percentage,
    amount: Money<'a, Currency>,
    cap: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, DiscountError> {
    if cap.currency() != amount.currency() {
        return Err(DiscountError::Money(MoneyError::CurrencyMismatch {
            expected: amount.currency().iso_alpha_code,
            actual: cap.currency().iso_alpha_code,
        }));
    }

    let raw = percent_of_minor(percent, amount.to_minor_units())?;
    let discount = raw
        .min(cap.to_minor_units())
        .min(amount.to_minor_units())
        .max(0);

    Ok(Money::from_minor(discount, amount.currency()))
}

/// Percent points (`20.00` for 20%) for display.
pub fn percent_points(percent: &Percentage) -> Decimal {
    ((*percent) * Decimal::ONE * Decimal::ONE_HUNDRED).round_dp(2)
}
