//! Percentage Discount
//!
//! Each application requires a number of units and takes a percentage off the
//! price of a single unit.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

use crate::offers::{OfferError, validate_required_quantity};

/// Buy `required_quantity` units, get `percentage` off one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentageDiscountOffer {
    product: String,
    required_quantity: u32,
    percentage: Percentage,
}

impl PercentageDiscountOffer {
    /// Create a new percentage discount offer.
    ///
    /// # Errors
    ///
    /// - [`OfferError::InvalidRequiredQuantity`]: `required_quantity` is zero.
    /// - [`OfferError::InvalidPercentage`]: `percentage` is below 0% or above 100%.
    pub fn new(
        product: impl Into<String>,
        required_quantity: u32,
        percentage: Percentage,
    ) -> Result<Self, OfferError> {
        let product = product.into();

        validate_required_quantity(&product, required_quantity)?;

        let fraction = percentage * Decimal::ONE;

        if fraction < Decimal::ZERO || fraction > Decimal::ONE {
            return Err(OfferError::InvalidPercentage(product));
        }

        Ok(Self {
            product,
            required_quantity,
            percentage,
        })
    }

    /// Return the product name
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Return the number of units required per application
    pub fn required_quantity(&self) -> u32 {
        self.required_quantity
    }

    /// Return the percentage taken off one unit per application
    pub fn percentage(&self) -> Percentage {
        self.percentage
    }
}
