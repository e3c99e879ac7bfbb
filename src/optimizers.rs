//! Optimizers for Offer Combinations

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{discounts::DiscountError, offers::Offer, resolver::OfferCombination};

pub mod exhaustive;
pub mod knapsack;

pub use exhaustive::ExhaustiveOptimizer;
pub use knapsack::KnapsackOptimizer;

/// Optimizer Errors
#[derive(Debug, Error, PartialEq)]
pub enum OptimizerError {
    /// Wrapped discount calculation error.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// The line allows too many offer applications to search within bounded memory.
    #[error("offer search for a quantity of {quantity} exceeds the search bound")]
    SearchSpaceTooLarge {
        /// Line quantity
        quantity: u32,
    },

    /// Internal optimizer invariant was violated (this is a bug).
    #[error("optimizer invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// The highest-discount combination found for a line.
#[derive(Debug, Clone, PartialEq)]
pub struct BestCombination<'o> {
    /// Offer applications making up the combination
    pub combination: OfferCombination<'o>,

    /// Total discount of the combination, unrounded
    pub discount: Decimal,
}

/// Trait for choosing the best combination of offers for a basket line
pub trait DiscountOptimizer {
    /// Find the maximum-discount combination of `applicable` offers for
    /// `quantity` units at `unit_price`.
    ///
    /// Returns `Ok(None)` when no combination exists (no applicable offers, or
    /// none fits in the quantity).
    ///
    /// # Errors
    ///
    /// Returns an [`OptimizerError`] if discount arithmetic fails.
    fn optimize<'o>(
        quantity: u32,
        applicable: &[&'o Offer],
        unit_price: Decimal,
    ) -> Result<Option<BestCombination<'o>>, OptimizerError>;
}
