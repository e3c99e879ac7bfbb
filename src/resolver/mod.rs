//! Offer Applicability
//!
//! Decides which offers can be used for a basket line and enumerates the
//! combinations of them a pricer has to evaluate.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    basket::{Basket, BasketLine},
    offers::{Offer, OfferIndex},
};

pub mod combinations;

pub use combinations::{Combinations, OfferCombination, combinations_for};

/// Offers usable for a single basket line, in index order.
pub type ApplicableOffers<'o> = SmallVec<[&'o Offer; 4]>;

/// Return whether at least one application of `offer` fits in `line`.
pub fn is_applicable(line: &BasketLine, offer: &Offer) -> bool {
    offer.product() == line.product()
        && line
            .quantity()
            .checked_div(offer.required_quantity())
            .is_some_and(|applications| applications >= 1)
}

/// Resolves the offers applicable to basket lines from an [`OfferIndex`].
#[derive(Debug, Clone, Copy)]
pub struct OfferApplicabilityResolver<'o> {
    index: &'o OfferIndex,
}

impl<'o> OfferApplicabilityResolver<'o> {
    /// Create a resolver over the given offer index.
    pub fn new(index: &'o OfferIndex) -> Self {
        Self { index }
    }

    /// Offers for the line's product whose required quantity fits in the line.
    pub fn applicable_offers(&self, line: &BasketLine) -> ApplicableOffers<'o> {
        self.index
            .offers_for(line.product())
            .iter()
            .filter(|offer| is_applicable(line, offer))
            .collect()
    }

    /// Applicable offers for every line of the basket that has any, keyed by product.
    pub fn applicable_offers_for_basket(
        &self,
        basket: &Basket,
    ) -> FxHashMap<String, ApplicableOffers<'o>> {
        basket
            .iter()
            .filter_map(|line| {
                let offers = self.applicable_offers(line);

                (!offers.is_empty()).then(|| (line.product().to_string(), offers))
            })
            .collect()
    }

    /// Enumerate the maximal combinations of `applicable` offers for `line`.
    pub fn combinations_for<'s>(
        line: &BasketLine,
        applicable: &'s [&'o Offer],
    ) -> Combinations<'o, 's> {
        combinations_for(line.quantity(), applicable)
    }
}
