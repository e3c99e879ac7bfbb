//! Basket Pricer prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError, BasketLine},
    catalog::{Catalog, CatalogError, ProductCatalog},
    discounts::{DiscountError, discount_for, discount_for_combination},
    offers::{
        FreeProductsOffer, Offer, OfferError, OfferIndex, PercentageDiscountOffer, offer,
    },
    optimizers::{
        BestCombination, DiscountOptimizer, ExhaustiveOptimizer, KnapsackOptimizer,
        OptimizerError,
    },
    pricing::{
        BasketPriceCalculator, LinePrice, OfferApplication, PriceResult, PricingError,
        calculate_price,
    },
    products::Product,
    receipt::{Receipt, ReceiptError},
    resolver::{OfferApplicabilityResolver, OfferCombination},
};
