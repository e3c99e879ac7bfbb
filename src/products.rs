//! Products

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product name, unique within a catalog
    pub name: String,

    /// Product unit price
    pub price: Money<'a, Currency>,
}

impl<'a> Product<'a> {
    /// Create a new product.
    pub fn new(name: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Unit price as an exact decimal amount in major units (e.g. `2.50`).
    pub fn unit_price(&self) -> Decimal {
        minor_to_decimal(self.price.to_minor_units(), self.price.currency())
    }
}

/// Convert an amount in minor units (pence, cents) of `currency` to major units.
pub fn minor_to_decimal(minor: i64, currency: &Currency) -> Decimal {
    Decimal::new(minor, currency.exponent)
}
