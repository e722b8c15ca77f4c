//! Utils

use std::path::PathBuf;

use clap::Parser;

use crate::{
    config::{ConfigError, OptimiserConfig},
    weight::Weight,
};

/// Arguments for the optimiser binary
#[derive(Debug, Parser)]
#[command(name = "cart-optimiser", about = "Optimise a fixture cart under a budget and weight limit")]
pub struct OptimiseArgs {
    /// Fixture set to load products and coupons from
    #[arg(short, long, default_value = "grocery")]
    pub catalogue: String,

    /// Cart fixture to optimise
    #[arg(long, default_value = "grocery")]
    pub cart: String,

    /// Budget (e.g., "50.00 USD"); overrides the cart fixture
    #[arg(short, long)]
    pub budget: Option<String>,

    /// Weight limit (e.g., "10 kg"); overrides the cart fixture
    #[arg(short, long)]
    pub weight_limit: Option<Weight>,

    /// Optimiser config file (YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the unit count above which the greedy heuristic is used
    #[arg(long)]
    pub unit_threshold: Option<u64>,

    /// Override the budget (major units) above which the greedy heuristic is used
    #[arg(long)]
    pub budget_threshold: Option<u64>,

    /// User placing the order
    #[arg(short, long, default_value_t = 1)]
    pub user: u32,

    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl OptimiseArgs {
    /// Optimiser configuration from the config file, if any, with command line
    /// overrides applied.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config file cannot be read or parsed.
    pub fn optimiser_config(&self) -> Result<OptimiserConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => OptimiserConfig::from_file(path)?,
            None => OptimiserConfig::default(),
        };

        if let Some(unit_threshold) = self.unit_threshold {
            config.unit_threshold = unit_threshold;
        }

        if let Some(budget_threshold) = self.budget_threshold {
            config.budget_threshold = budget_threshold;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_to_grocery_fixtures() -> TestResult {
        let args = OptimiseArgs::try_parse_from(["cart-optimiser"])?;

        assert_eq!(args.catalogue, "grocery");
        assert_eq!(args.cart, "grocery");
        assert_eq!(args.optimiser_config()?, OptimiserConfig::default());

        Ok(())
    }

    #[test]
    fn parses_weight_limit() -> TestResult {
        let args = OptimiseArgs::try_parse_from(["cart-optimiser", "-w", "2.5 kg"])?;

        assert_eq!(args.weight_limit, Some(Weight::from_grams(2500)));

        Ok(())
    }

    #[test]
    fn flags_override_config_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("optimiser.yml");

        fs::write(&path, "unit_threshold: 40\nbudget_threshold: 500\n")?;

        let path = path.to_string_lossy();

        let args = OptimiseArgs::try_parse_from([
            "cart-optimiser",
            "--config",
            &*path,
            "--unit-threshold",
            "60",
        ])?;

        let config = args.optimiser_config()?;

        assert_eq!(config.unit_threshold, 60);
        assert_eq!(config.budget_threshold, 500);

        Ok(())
    }
}
