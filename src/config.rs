//! Optimiser configuration
//!
//! Tunables for the size-based dispatch between the exact dynamic program and
//! the greedy heuristic, and for how the dynamic program bounds its budget
//! levels and weight limit.

use std::{fs, path::Path};

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

/// Decimal digits in [`crate::weight::GRAMS_PER_KG`].
const KG_EXPONENT: u32 = 3;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Optimiser tunables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimiserConfig {
    /// Carts with more expanded units than this use the greedy heuristic.
    pub unit_threshold: u64,

    /// Budgets above this many major currency units use the greedy heuristic.
    pub budget_threshold: u64,

    /// Decimal digits of the major currency unit kept when discretising prices.
    pub price_precision: u32,

    /// Decimal digits of the kilogram in one weight step.
    pub weight_precision: u32,

    /// Upper bound on the discretised budget dimension.
    pub max_budget_steps: u32,

    /// Weight steps the dynamic program accepts; larger weight limits are
    /// capped to this many steps.
    pub max_weight_steps: u32,
}

impl Default for OptimiserConfig {
    fn default() -> Self {
        Self {
            unit_threshold: 100,
            budget_threshold: 10_000,
            price_precision: 1,
            weight_precision: 1,
            max_budget_steps: 50_000,
            max_weight_steps: 5_000,
        }
    }
}

impl OptimiserConfig {
    /// Parse a configuration from YAML; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the document is malformed or has unknown keys.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Load a configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Budget threshold expressed in minor units of `currency`.
    pub fn budget_threshold_minor(&self, currency: &Currency) -> i64 {
        let scale = 10_i64.checked_pow(currency.exponent).unwrap_or(i64::MAX);
        let threshold = i64::try_from(self.budget_threshold).unwrap_or(i64::MAX);

        threshold.saturating_mul(scale)
    }

    /// Whether a cart of `units` expanded units against `budget` is too large
    /// for the exact method.
    pub fn exceeds_exact_limits(&self, units: u64, budget: &Money<'_, Currency>) -> bool {
        units > self.unit_threshold
            || budget.to_minor_units() > self.budget_threshold_minor(budget.currency())
    }

    /// Minor units of `currency` covered by one discretised budget step.
    pub fn price_step(&self, currency: &Currency) -> i64 {
        let dropped = currency.exponent.saturating_sub(self.price_precision);

        10_i64.checked_pow(dropped).unwrap_or(i64::MAX)
    }

    /// Grams covered by one weight step.
    pub fn weight_step(&self) -> u64 {
        let dropped = KG_EXPONENT.saturating_sub(self.weight_precision);

        10_u64.checked_pow(dropped).unwrap_or(u64::MAX)
    }
}
