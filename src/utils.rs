//! Utils

use clap::{Parser, ValueEnum};

use crate::{
    basket::Basket,
    catalog::Catalog,
    offers::OfferIndex,
    optimizers::KnapsackOptimizer,
    pricing::{BasketPriceCalculator, PriceResult, PricingError},
};

/// Arguments for the basket demo
#[derive(Debug, Parser)]
pub struct ExampleBasketArgs {
    /// Fixture set to use for the catalog, offers & basket
    #[clap(short, long, default_value = "groceries")]
    pub fixture: String,

    /// Search used to find the best offer combination per line
    #[clap(short, long, value_enum, default_value_t = OptimizerKind::Exhaustive)]
    pub optimizer: OptimizerKind,

    /// Log filter used when `RUST_LOG` is unset
    #[clap(short, long, default_value = "warn")]
    pub log_level: String,
}

/// Optimizer selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptimizerKind {
    /// Enumerate every maximal combination
    Exhaustive,

    /// Unbounded knapsack dynamic program
    Knapsack,
}

impl OptimizerKind {
    /// Price `basket` with this optimizer.
    ///
    /// # Errors
    ///
    /// See [`BasketPriceCalculator::calculate`].
    pub fn calculate(
        self,
        basket: &Basket,
        catalog: &impl Catalog,
        offers: &OfferIndex,
    ) -> Result<PriceResult, PricingError> {
        match self {
            OptimizerKind::Exhaustive => BasketPriceCalculator::new(catalog, offers).calculate(basket),
            OptimizerKind::Knapsack => {
                BasketPriceCalculator::<_, KnapsackOptimizer>::with_optimizer(catalog, offers)
                    .calculate(basket)
            }
        }
    }
}
