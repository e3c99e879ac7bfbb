//! Free Products
//!
//! "Buy 3, get 1 free" style offers: every application requires a number of
//! units and makes a number of units free.

use crate::offers::{OfferError, validate_required_quantity};

/// Buy `required_quantity` units, get `free_count` units free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeProductsOffer {
    product: String,
    required_quantity: u32,
    free_count: u32,
}

impl FreeProductsOffer {
    /// Create a new free products offer.
    ///
    /// # Errors
    ///
    /// - [`OfferError::InvalidRequiredQuantity`]: `required_quantity` is zero.
    /// - [`OfferError::InvalidFreeCount`]: `free_count` is zero.
    pub fn new(
        product: impl Into<String>,
        required_quantity: u32,
        free_count: u32,
    ) -> Result<Self, OfferError> {
        let product = product.into();

        validate_required_quantity(&product, required_quantity)?;

        if free_count == 0 {
            return Err(OfferError::InvalidFreeCount(product));
        }

        Ok(Self {
            product,
            required_quantity,
            free_count,
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

    /// Return the number of free units per application
    pub fn free_count(&self) -> u32 {
        self.free_count
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_stores_fields() -> TestResult {
        let offer = FreeProductsOffer::new("biscuits", 3, 1)?;

        assert_eq!(offer.product(), "biscuits");
        assert_eq!(offer.required_quantity(), 3);
        assert_eq!(offer.free_count(), 1);

        Ok(())
    }

    #[test]
    fn new_rejects_zero_required_quantity() {
        let result = FreeProductsOffer::new("biscuits", 0, 1);

        assert_eq!(
            result,
            Err(OfferError::InvalidRequiredQuantity("biscuits".into()))
        );
    }

    #[test]
    fn new_rejects_zero_free_count() {
        let result = FreeProductsOffer::new("biscuits", 3, 0);

        assert_eq!(result, Err(OfferError::InvalidFreeCount("biscuits".into())));
    }
}
