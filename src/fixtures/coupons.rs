//! Coupon Fixtures

use decimal_percentage::Percentage;
use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{
    coupons::Coupon,
    fixtures::{FixtureError, products::parse_price_in},
};

/// Wrapper for coupons in YAML
///
/// Coupons are a list rather than a map: their order decides ties.
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Coupons in priority order
    pub coupons: Vec<CouponFixture>,
}

/// Coupon Fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CouponFixture {
    /// Catalogue identifier
    pub id: u32,

    /// Code shown to the shopper
    pub code: String,

    /// Smallest qualifying subtotal (e.g., "100.00 USD")
    pub min_cart_value: String,

    /// Discount (e.g., "20%" or "0.2")
    pub discount: String,

    /// Discount cap (e.g., "50.00 USD")
    pub max_discount: String,

    /// Description
    #[serde(default)]
    pub description: String,
}

impl CouponFixture {
    /// Convert to a [`Coupon`] priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount or the percentage cannot be parsed, or an
    /// amount is in another currency.
    pub fn try_into_coupon(self, currency: &Currency) -> Result<Coupon<'_>, FixtureError> {
        Ok(Coupon {
            id: self.id,
            min_cart_value: parse_price_in(&self.min_cart_value, currency)?,
            discount_percent: parse_percentage(&self.discount)?,
            max_discount: parse_price_in(&self.max_discount, currency)?,
            code: self.code,
            description: self.description,
        })
    }
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value / 100.0))
    } else {
        let value = trimmed
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };

    use super::*;

    fn save20() -> CouponFixture {
        CouponFixture {
            id: 1,
            code: "SAVE20".to_string(),
            min_cart_value: "100.00 USD".to_string(),
            discount: "20%".to_string(),
            max_discount: "50.00 USD".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> Result<(), FixtureError> {
        assert_eq!(parse_percentage("15%")?, Percentage::from(0.15));
        assert_eq!(parse_percentage(" 0.15 ")?, Percentage::from(0.15));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_invalid_format() {
        let result = parse_percentage("fifteen");

        assert!(matches!(result, Err(FixtureError::InvalidPercentage(_))));
    }

    #[test]
    fn coupon_fixture_converts_amounts() -> Result<(), FixtureError> {
        let coupon = save20().try_into_coupon(USD)?;

        assert_eq!(coupon.code, "SAVE20");
        assert_eq!(coupon.min_cart_value, Money::from_minor(10_000, USD));
        assert_eq!(coupon.max_discount, Money::from_minor(5_000, USD));
        assert_eq!(coupon.discount_percent, Percentage::from(0.2));

        Ok(())
    }

    #[test]
    fn coupon_fixture_rejects_other_currency() {
        let result = save20().try_into_coupon(GBP);

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(..))));
    }
}
