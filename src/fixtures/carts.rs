//! Cart Fixtures

use serde::Deserialize;

/// A cart and the constraints to optimise it under.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CartFixture {
    /// Spending ceiling (e.g., "100.00 USD")
    #[serde(default)]
    pub budget: Option<String>,

    /// Weight ceiling (e.g., "15 kg")
    #[serde(default)]
    pub weight_limit: Option<String>,

    /// Lines in cart order
    pub lines: Vec<CartLineFixture>,
}

/// One cart line, referencing a product by its fixture key.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CartLineFixture {
    /// Product fixture key
    pub product: String,

    /// Units wanted
    pub quantity: u32,
}
