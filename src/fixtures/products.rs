//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Product, ProductId, ValueScore},
    weight::Weight,
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductFixture {
    /// Catalogue identifier
    pub id: u32,

    /// Product name
    pub name: String,

    /// Unit price (e.g., "12.99 USD")
    pub price: String,

    /// Unit weight (e.g., "1.03 kg" or "500 g")
    pub weight: String,

    /// Value score, 1 to 10
    pub value_score: u8,

    /// Units in stock; unlimited when omitted
    #[serde(default)]
    pub stock: Option<u32>,

    /// Category label
    #[serde(default)]
    pub category: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Whether the product spoils
    #[serde(default)]
    pub perishable: bool,

    /// Shelf life in days
    #[serde(default)]
    pub expiry_days: Option<u32>,
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let weight: Weight = fixture.weight.parse()?;

        let mut product = Product::new(
            ProductId(fixture.id),
            fixture.name,
            Money::from_minor(minor_units, currency),
            weight,
            ValueScore::new(fixture.value_score)?,
        )
        .with_category(fixture.category);

        product.stock = fixture.stock.unwrap_or(u32::MAX);
        product.description = fixture.description;
        product.perishable = fixture.perishable;
        product.expiry_days = fixture.expiry_days;

        Ok(product)
    }
}

/// Parse price string (e.g., "2.99 USD") into minor units and currency
///
/// The amount is scaled by the currency's own exponent and rounded to a
/// whole minor unit.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a decimal number, or if the currency code is not
/// recognised.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = match currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::from(scale))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Parse a price that must be in `currency`.
///
/// # Errors
///
/// Returns [`FixtureError::CurrencyMismatch`] for any other currency, or a
/// parse error from [`parse_price`].
pub fn parse_price_in<'a>(
    s: &str,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, FixtureError> {
    let (minor_units, parsed) = parse_price(s)?;

    if parsed != currency {
        return Err(FixtureError::CurrencyMismatch(
            currency.iso_alpha_code.to_string(),
            parsed.iso_alpha_code.to_string(),
        ));
    }

    Ok(Money::from_minor(minor_units, currency))
}

#[cfg(test)]
mod tests {
    use crate::products::ProductError;

    use super::*;

    fn fixture(value_score: u8) -> ProductFixture {
        ProductFixture {
            id: 2,
            name: "Whole Milk (1L)".to_string(),
            price: "3.49 USD".to_string(),
            weight: "1.03 kg".to_string(),
            value_score,
            stock: Some(30),
            category: "Dairy".to_string(),
            description: String::new(),
            perishable: true,
            expiry_days: Some(7),
        }
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_usd_and_eur() -> Result<(), FixtureError> {
        let (usd_minor, usd) = parse_price("12.99 USD")?;
        let (eur_minor, eur) = parse_price("2.5 EUR")?;

        assert_eq!(usd_minor, 1299);
        assert_eq!(usd, USD);
        assert_eq!(eur_minor, 250);
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn parse_price_in_rejects_other_currency() {
        let result = parse_price_in("1.00 GBP", USD);

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(..))));
    }

    #[test]
    fn product_fixture_converts_all_fields() -> Result<(), FixtureError> {
        let product = Product::try_from(fixture(8))?;

        assert_eq!(product.id, ProductId(2));
        assert_eq!(product.price, Money::from_minor(349, USD));
        assert_eq!(product.weight, Weight::from_grams(1030));
        assert_eq!(product.value_score.get(), 8);
        assert_eq!(product.stock, 30);
        assert_eq!(product.expiry_days, Some(7));

        Ok(())
    }

    #[test]
    fn product_fixture_rejects_out_of_range_score() {
        let result = Product::try_from(fixture(11));

        assert!(matches!(
            result,
            Err(FixtureError::Product(ProductError::ValueScoreOutOfRange(11)))
        ));
    }
}
