//! Offer Fixtures

use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, products::parse_percentage},
    offers::{FreeProductsOffer, Offer, PercentageDiscountOffer},
};

/// Wrapper for offers in YAML
#[derive(Debug, Deserialize)]
pub struct OffersFixture {
    /// Offers, in the order they were defined
    pub offers: Vec<OfferFixture>,
}

/// Offer Fixture
///
/// The `type` is kept as a string so an unknown kind is reported as
/// [`FixtureError::UnsupportedOfferType`] rather than a YAML error.
#[derive(Debug, Deserialize)]
pub struct OfferFixture {
    /// Offer kind: `free_products` or `percentage_discount`
    #[serde(rename = "type")]
    pub kind: String,

    /// Product the offer targets
    pub product: String,

    /// Units needed for one application
    pub required: u32,

    /// Free units per application (`free_products`)
    #[serde(default)]
    pub free: Option<u32>,

    /// Percentage off one unit (`percentage_discount`), e.g. "25%" or "0.25"
    #[serde(default)]
    pub percentage: Option<String>,
}

impl TryFrom<OfferFixture> for Offer {
    type Error = FixtureError;

    fn try_from(fixture: OfferFixture) -> Result<Self, Self::Error> {
        match fixture.kind.as_str() {
            "free_products" => {
                let free = fixture.free.ok_or_else(|| {
                    FixtureError::InvalidOfferData(format!(
                        "free_products offer for {} is missing `free`",
                        fixture.product
                    ))
                })?;

                Ok(FreeProductsOffer::new(fixture.product, fixture.required, free)?.into())
            }
            "percentage_discount" => {
                let percentage = fixture.percentage.as_deref().ok_or_else(|| {
                    FixtureError::InvalidOfferData(format!(
                        "percentage_discount offer for {} is missing `percentage`",
                        fixture.product
                    ))
                })?;

                Ok(PercentageDiscountOffer::new(
                    fixture.product,
                    fixture.required,
                    parse_percentage(percentage)?,
                )?
                .into())
            }
            other => Err(FixtureError::UnsupportedOfferType(other.to_string())),
        }
    }
}
