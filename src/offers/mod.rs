//! Offers

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

pub mod free_products;
pub mod index;
pub mod percentage_discount;

pub use free_products::FreeProductsOffer;
pub use index::OfferIndex;
pub use percentage_discount::PercentageDiscountOffer;

/// Errors raised when constructing an offer.
#[derive(Debug, Error, PartialEq)]
pub enum OfferError {
    /// The offer requires zero units to apply.
    #[error("Offer for {0} must require at least 1 unit")]
    InvalidRequiredQuantity(String),

    /// A free-products offer grants zero free units.
    #[error("Offer for {0} must grant at least 1 free unit")]
    InvalidFreeCount(String),

    /// A percentage outside of 0-100%.
    #[error("Offer for {0} has a percentage outside of 0-100%")]
    InvalidPercentage(String),
}

/// Offer enum
#[derive(Debug, Clone, PartialEq)]
pub enum Offer {
    /// Buy a number of units, get some of them free
    FreeProducts(FreeProductsOffer),

    /// Buy a number of units, get a percentage off one unit's price
    PercentageDiscount(PercentageDiscountOffer),
}

impl Offer {
    /// Return the name of the product the offer targets.
    pub fn product(&self) -> &str {
        match self {
            Offer::FreeProducts(free_products) => free_products.product(),
            Offer::PercentageDiscount(percentage) => percentage.product(),
        }
    }

    /// Return the number of units needed for one application of the offer.
    pub fn required_quantity(&self) -> u32 {
        match self {
            Offer::FreeProducts(free_products) => free_products.required_quantity(),
            Offer::PercentageDiscount(percentage) => percentage.required_quantity(),
        }
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offer::FreeProducts(free_products) => write!(
                f,
                "Buy {}, get {} free",
                free_products.required_quantity(),
                free_products.free_count()
            ),
            Offer::PercentageDiscount(percentage) => {
                let points = (percentage.percentage() * Decimal::ONE_HUNDRED).normalize();

                if percentage.required_quantity() == 1 {
                    write!(f, "{points}% off")
                } else {
                    write!(
                        f,
                        "Buy {}, get {points}% off one",
                        percentage.required_quantity()
                    )
                }
            }
        }
    }
}

impl From<FreeProductsOffer> for Offer {
    fn from(offer: FreeProductsOffer) -> Self {
        Offer::FreeProducts(offer)
    }
}

impl From<PercentageDiscountOffer> for Offer {
    fn from(offer: PercentageDiscountOffer) -> Self {
        Offer::PercentageDiscount(offer)
    }
}

/// Wrap a concrete offer in the [`Offer`] enum.
pub fn offer(offer: impl Into<Offer>) -> Offer {
    offer.into()
}

fn validate_required_quantity(product: &str, required_quantity: u32) -> Result<(), OfferError> {
    if required_quantity == 0 {
        Err(OfferError::InvalidRequiredQuantity(product.to_string()))
    } else {
        Ok(())
    }
}
