//! Basket Fixtures

use serde::Deserialize;

/// Wrapper for basket lines in YAML
#[derive(Debug, Deserialize)]
pub struct BasketFixture {
    /// Basket lines, in basket order
    pub lines: Vec<BasketLineFixture>,
}

/// A product and how many units of it are in the basket
#[derive(Debug, Deserialize)]
pub struct BasketLineFixture {
    /// Product name
    pub product: String,

    /// Units purchased
    pub quantity: u32,
}
