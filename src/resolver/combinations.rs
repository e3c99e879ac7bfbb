//! Offer Combinations
//!
//! Enumerates multisets of offer applications (combinations with repetition)
//! that cover a line's quantity as far as any offer can. Combinations are
//! produced lazily, smallest first, and in lexicographic order of the offers'
//! positions within each size.

use std::ptr;

use smallvec::{SmallVec, smallvec};

use crate::offers::Offer;

/// A multiset of offer applications for a single basket line.
///
/// An offer used `n` times appears `n` times.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OfferCombination<'o> {
    offers: SmallVec<[&'o Offer; 8]>,
}

impl<'o> OfferCombination<'o> {
    /// Create a combination from the given offer applications.
    pub fn new(offers: impl IntoIterator<Item = &'o Offer>) -> Self {
        Self {
            offers: offers.into_iter().collect(),
        }
    }

    /// Return the offer applications in the combination.
    pub fn offers(&self) -> &[&'o Offer] {
        &self.offers
    }

    /// Iterate over the offer applications.
    pub fn iter(&self) -> impl Iterator<Item = &'o Offer> + '_ {
        self.offers.iter().copied()
    }

    /// Add one more application of an offer.
    pub fn push(&mut self, offer: &'o Offer) {
        self.offers.push(offer);
    }

    /// Number of offer applications.
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    /// Check if the combination applies no offers.
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Total number of units consumed by the offer applications.
    pub fn covered_quantity(&self) -> u64 {
        self.offers
            .iter()
            .map(|offer| u64::from(offer.required_quantity()))
            .sum()
    }

    /// Collapse repeated applications into `(offer, times)` pairs, in order of
    /// first appearance.
    pub fn applications(&self) -> SmallVec<[(&'o Offer, u32); 4]> {
        let mut applications: SmallVec<[(&'o Offer, u32); 4]> = SmallVec::new();

        for &offer in &self.offers {
            match applications
                .iter_mut()
                .find(|(existing, _)| ptr::eq(*existing, offer))
            {
                Some((_, times)) => *times = times.saturating_add(1),
                None => applications.push((offer, 1)),
            }
        }

        applications
    }
}

/// Lazy iterator over the maximal offer combinations for one line.
///
/// Cloning the iterator, or calling [`combinations_for`] again, restarts the
/// enumeration.
#[derive(Debug, Clone)]
pub struct Combinations<'o, 's> {
    offers: &'s [&'o Offer],
    quantity: u64,
    min_required: u64,
    max_size: usize,
    indices: SmallVec<[usize; 8]>,
    exhausted: bool,
}

/// Enumerate every maximal combination of `applicable` offers for `quantity` units.
///
/// A combination is yielded when the units it covers fit within `quantity`
/// and the uncovered remainder is smaller than the smallest required quantity
/// of any applicable offer.
pub fn combinations_for<'o, 's>(quantity: u32, applicable: &'s [&'o Offer]) -> Combinations<'o, 's> {
    let min_required = applicable
        .iter()
        .map(|offer| offer.required_quantity())
        .min()
        .unwrap_or(0);

    let max_size = quantity
        .checked_div(min_required)
        .and_then(|size| usize::try_from(size).ok())
        .unwrap_or(0);

    Combinations {
        offers: applicable,
        quantity: u64::from(quantity),
        min_required: u64::from(min_required),
        max_size,
        indices: smallvec![0],
        exhausted: applicable.is_empty() || max_size == 0,
    }
}

impl Combinations<'_, '_> {
    /// Largest combination size that could fit within the quantity.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Number of candidate multisets the enumeration steps through, maximal or
    /// not, saturating at `u64::MAX`.
    ///
    /// With `n` offers and up to `m` applications this is `C(n + m, m) - 1`.
    pub fn search_space(&self) -> u64 {
        if self.offers.is_empty() || self.max_size == 0 {
            return 0;
        }

        let offers = u128::try_from(self.offers.len()).unwrap_or(u128::MAX);
        let max_size = u128::try_from(self.max_size).unwrap_or(u128::MAX);
        let (small, large) = (offers.min(max_size), offers.max(max_size));

        let mut count: u128 = 1;

        for step in 1..=small {
            // C(large + step, step) from C(large + step - 1, step - 1), exact at every step
            let Some(next) = large
                .checked_add(step)
                .and_then(|factor| count.checked_mul(factor))
                .and_then(|product| product.checked_div(step))
            else {
                return u64::MAX;
            };

            if next > u128::from(u64::MAX) {
                return u64::MAX;
            }

            count = next;
        }

        u64::try_from(count.saturating_sub(1)).unwrap_or(u64::MAX)
    }

    fn covered_quantity(&self) -> u64 {
        self.indices
            .iter()
            .filter_map(|&idx| self.offers.get(idx))
            .map(|offer| u64::from(offer.required_quantity()))
            .sum()
    }

    fn is_maximal(&self, covered: u64) -> bool {
        covered <= self.quantity && self.quantity - covered < self.min_required
    }

    /// Step to the next multiset: the next non-decreasing index sequence of
    /// the current size, or the first one of the next size.
    fn advance(&mut self) {
        let last = self.offers.len().saturating_sub(1);

        match self.indices.iter().rposition(|&idx| idx < last) {
            Some(pos) => {
                let mut tail = self.indices.iter_mut().skip(pos);

                let next = match tail.next() {
                    Some(idx) => {
                        *idx += 1;
                        *idx
                    }
                    None => return,
                };

                for idx in tail {
                    *idx = next;
                }
            }
            None => {
                let size = self.indices.len() + 1;

                if size > self.max_size {
                    self.exhausted = true;
                } else {
                    self.indices = smallvec![0; size];
                }
            }
        }
    }
}

impl<'o> Iterator for Combinations<'o, '_> {
    type Item = OfferCombination<'o>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            let covered = self.covered_quantity();

            let candidate = self.is_maximal(covered).then(|| {
                OfferCombination::new(
                    self.indices
                        .iter()
                        .filter_map(|&idx| self.offers.get(idx).copied()),
                )
            });

            self.advance();

            if candidate.is_some() {
                return candidate;
            }
        }

        None
    }
}
