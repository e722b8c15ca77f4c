//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::cart::CartLine;

/// Errors that can occur while calculating a subtotal.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Sum of unit price × quantity over `lines`.
///
/// An empty slice sums to zero in `currency`.
///
/// # Errors
///
/// - [`TotalPriceError::Money`]: a line is priced in a currency other than `currency`.
pub fn subtotal<'a>(
    lines: &[CartLine<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    let total = lines
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| {
            acc.add(Money::from_minor(
                line.line_total_minor(),
                line.product().price.currency(),
            ))
        })?;

    Ok(total)
}
