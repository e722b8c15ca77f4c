//! Products

use std::fmt;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::weight::Weight;

/// Highest value score a product can carry.
pub const MAX_VALUE_SCORE: u8 = 10;

/// Errors produced when building product data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    /// Value score outside `1..=10`.
    #[error("value score {0} is outside 1..={MAX_VALUE_SCORE}")]
    ValueScoreOutOfRange(u8),
}

/// Stable catalogue identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-unit utility rating, the quantity the optimiser maximises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueScore(u8);

impl ValueScore {
    /// Create a value score, rejecting anything outside `1..=10`.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::ValueScoreOutOfRange`] for 0 or anything above 10.
    pub const fn new(score: u8) -> Result<Self, ProductError> {
        if score == 0 || score > MAX_VALUE_SCORE {
            return Err(ProductError::ValueScoreOutOfRange(score));
        }

        Ok(ValueScore(score))
    }

    /// The raw score.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ValueScore {
    type Error = ProductError;

    fn try_from(score: u8) -> Result<Self, Self::Error> {
        ValueScore::new(score)
    }
}

/// Immutable catalogue entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Catalogue identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Money<'a, Currency>,

    /// Unit weight
    pub weight: Weight,

    /// Per-unit utility
    pub value_score: ValueScore,

    /// Units available
    pub stock: u32,

    /// Category label
    pub category: String,

    /// Free-text description
    pub description: String,

    /// Whether the product spoils
    pub perishable: bool,

    /// Shelf life in days, for perishable products
    pub expiry_days: Option<u32>,
}

impl<'a> Product<'a> {
    /// Create a product with the fields the optimiser needs; descriptive
    /// fields start empty.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Money<'a, Currency>,
        weight: Weight,
        value_score: ValueScore,
    ) -> Self {
        Product {
            id,
            name: name.into(),
            price,
            weight,
            value_score,
            stock: u32::MAX,
            category: String::new(),
            description: String::new(),
            perishable: false,
            expiry_days: None,
        }
    }

    /// Set the available stock.
    #[must_use]
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// Set the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    #[test]
    fn value_score_accepts_one_to_ten() -> Result<(), ProductError> {
        assert_eq!(ValueScore::new(1)?.get(), 1);
        assert_eq!(ValueScore::new(10)?.get(), 10);

        Ok(())
    }

    #[test]
    fn value_score_rejects_zero_and_eleven() {
        assert_eq!(
            ValueScore::new(0),
            Err(ProductError::ValueScoreOutOfRange(0))
        );
        assert_eq!(
            ValueScore::try_from(11),
            Err(ProductError::ValueScoreOutOfRange(11))
        );
    }

    #[test]
    fn builder_sets_stock_and_category() -> Result<(), ProductError> {
        let product = Product::new(
            ProductId(7),
            "Fresh Spinach (500g)",
            Money::from_minor(399, USD),
            Weight::from_grams(500),
            ValueScore::new(9)?,
        )
        .with_stock(15)
        .with_category("Vegetables");

        assert_eq!(product.stock, 15);
        assert_eq!(product.category, "Vegetables");
        assert!(!product.perishable);
        assert_eq!(product.id.to_string(), "#7");

        Ok(())
    }
}
