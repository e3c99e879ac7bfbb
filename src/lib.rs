//! Basket Pricer
//!
//! Prices shopping baskets against a product catalog, choosing for every line
//! the combination of multi-buy offers that gives the customer the largest
//! discount.

pub mod basket;
pub mod catalog;
pub mod discounts;
pub mod fixtures;
pub mod offers;
pub mod optimizers;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod resolver;
pub mod utils;
