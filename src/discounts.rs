//! Discounts
//!
//! Monetary value of offer applications. Amounts are exact decimals in major
//! units; nothing is rounded here.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{offers::Offer, resolver::OfferCombination};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Discount arithmetic overflowed the decimal range.
    #[error("discount calculation overflowed for product {0}")]
    Overflow(String),
}

/// Discount granted by a single application of `offer` at the given unit price.
///
/// # Errors
///
/// Returns [`DiscountError::Overflow`] if the amount cannot be represented.
pub fn discount_for(offer: &Offer, unit_price: Decimal) -> Result<Decimal, DiscountError> {
    let discount = match offer {
        Offer::FreeProducts(free_products) => {
            Decimal::from(free_products.free_count()).checked_mul(unit_price)
        }
        Offer::PercentageDiscount(percentage) => {
            (percentage.percentage() * Decimal::ONE).checked_mul(unit_price)
        }
    };

    discount.ok_or_else(|| DiscountError::Overflow(offer.product().to_string()))
}

/// Sum of the discounts of every offer application in the combination.
///
/// # Errors
///
/// Returns [`DiscountError::Overflow`] if the amount cannot be represented.
pub fn discount_for_combination(
    combination: &OfferCombination<'_>,
    unit_price: Decimal,
) -> Result<Decimal, DiscountError> {
    combination
        .iter()
        .try_fold(Decimal::ZERO, |total, offer| {
            let discount = discount_for(offer, unit_price)?;

            total
                .checked_add(discount)
                .ok_or_else(|| DiscountError::Overflow(offer.product().to_string()))
        })
}
