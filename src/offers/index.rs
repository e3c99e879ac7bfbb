//! Offer Index

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::offers::Offer;

/// Offers grouped by the product they target.
///
/// Built once from a flat list; the relative order of offers for the same
/// product is the order they were supplied in.
#[derive(Debug, Default)]
pub struct OfferIndex {
    offers: FxHashMap<String, SmallVec<[Offer; 2]>>,
    len: usize,
}

impl OfferIndex {
    /// Build an index from a flat list of offers.
    pub fn new(offers: impl IntoIterator<Item = Offer>) -> Self {
        let mut grouped: FxHashMap<String, SmallVec<[Offer; 2]>> = FxHashMap::default();
        let mut len = 0;

        for offer in offers {
            grouped
                .entry(offer.product().to_string())
                .or_default()
                .push(offer);

            len += 1;
        }

        Self {
            offers: grouped,
            len,
        }
    }

    /// Offers targeting the named product, empty if there are none.
    pub fn offers_for(&self, product: &str) -> &[Offer] {
        self.offers
            .get(product)
            .map(SmallVec::as_slice)
            .unwrap_or_default()
    }

    /// Iterate over every product with offers and its offers.
    pub fn offers(&self) -> impl Iterator<Item = (&str, &[Offer])> {
        self.offers
            .iter()
            .map(|(product, offers)| (product.as_str(), offers.as_slice()))
    }

    /// Total number of offers in the index.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index has no offers.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl FromIterator<Offer> for OfferIndex {
    fn from_iter<I: IntoIterator<Item = Offer>>(iter: I) -> Self {
        Self::new(iter)
    }
}
