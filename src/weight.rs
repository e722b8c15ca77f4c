//! Weights
//!
//! Weights are fixed-point, stored as whole grams so that sums and
//! comparisons never drift.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

/// Grams per kilogram.
pub const GRAMS_PER_KG: u64 = 1_000;

/// Errors produced when parsing a weight.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightError {
    /// The string was not `AMOUNT UNIT`, or the amount was not a number.
    #[error("invalid weight format: {0}")]
    InvalidFormat(String),

    /// Unit other than `kg` or `g`.
    #[error("unknown weight unit: {0}")]
    UnknownUnit(String),

    /// Weights cannot be negative.
    #[error("weight cannot be negative: {0}")]
    Negative(String),

    /// The amount does not fit in whole grams.
    #[error("weight out of range: {0}")]
    OutOfRange(String),
}

/// A non-negative weight in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight(u64);

impl Weight {
    /// Zero grams.
    pub const ZERO: Weight = Weight(0);

    /// Create a weight from whole grams.
    #[must_use]
    pub const fn from_grams(grams: u64) -> Self {
        Weight(grams)
    }

    /// Create a weight from whole kilograms.
    #[must_use]
    pub const fn from_kg(kg: u64) -> Self {
        Weight(kg.saturating_mul(GRAMS_PER_KG))
    }

    /// Weight in grams.
    #[must_use]
    pub const fn grams(self) -> u64 {
        self.0
    }

    /// Weight in kilograms as a decimal.
    #[must_use]
    pub fn kg(self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(GRAMS_PER_KG)
    }

    /// Add two weights, `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Weight) -> Option<Weight> {
        match self.0.checked_add(other.0) {
            Some(grams) => Some(Weight(grams)),
            None => None,
        }
    }

    /// Multiply by a quantity, saturating at `u64::MAX` grams.
    #[must_use]
    pub fn times(self, quantity: u32) -> Weight {
        Weight(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kg", self.kg().normalize())
    }
}

impl FromStr for Weight {
    type Err = WeightError;

    /// Parse `"1.03 kg"` or `"250 g"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();

        let (Some(amount), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(WeightError::InvalidFormat(s.to_string()));
        };

        let amount = amount
            .parse::<Decimal>()
            .map_err(|_err| WeightError::InvalidFormat(s.to_string()))?;

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(WeightError::Negative(s.to_string()));
        }

        let scale = match unit {
            "kg" => Decimal::from(GRAMS_PER_KG),
            "g" => Decimal::ONE,
            other => return Err(WeightError::UnknownUnit(other.to_string())),
        };

        amount
            .checked_mul(scale)
            .and_then(|grams| grams.round_dp(0).to_u64())
            .map(Weight)
            .ok_or_else(|| WeightError::OutOfRange(s.to_string()))
    }
}
