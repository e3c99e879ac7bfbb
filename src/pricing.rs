//! Pricing
//!
//! Prices every basket line with the best combination of its applicable
//! offers, then aggregates the lines. Line amounts are exact; the basket
//! subtotal and discount are rounded to minor units once, at aggregation, and
//! the basket total is their difference.

use std::marker::PhantomData;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    basket::{Basket, BasketLine},
    catalog::Catalog,
    discounts::{DiscountError, discount_for},
    offers::{Offer, OfferIndex},
    optimizers::{BestCombination, DiscountOptimizer, ExhaustiveOptimizer, OptimizerError},
    resolver::OfferApplicabilityResolver,
};

/// Errors that can occur while pricing a basket.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A basket line names a product the catalog does not have.
    #[error("Product not found in catalog: {0}")]
    ProductNotFound(String),

    /// The basket currency differs from the catalog currency (basket currency, catalog currency).
    #[error("Basket has currency {0}, but catalog has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Line or basket arithmetic overflowed.
    #[error("price calculation overflowed for {0}")]
    Overflow(String),

    /// A rounded amount does not fit in minor units.
    #[error("amount cannot be represented in minor units: {0}")]
    MinorUnitsNotRepresentable(Decimal),

    /// Wrapped discount calculation error.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped optimizer error.
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
}

/// An offer applied to a line, possibly several times.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferApplication {
    /// The applied offer
    pub offer: Offer,

    /// Number of times the offer was applied
    pub times: u32,

    /// Discount from all applications of the offer, unrounded
    pub discount: Decimal,
}

/// Exact price of a single basket line.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrice {
    product: String,
    quantity: u32,
    unit_price: Decimal,
    sub_total: Decimal,
    discount: Decimal,
    applications: SmallVec<[OfferApplication; 2]>,
}

impl LinePrice {
    /// Product name
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Quantity purchased
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price in major units
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Unit price times quantity
    pub fn sub_total(&self) -> Decimal {
        self.sub_total
    }

    /// Discount from the chosen offer combination
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Subtotal less discount
    pub fn total(&self) -> Decimal {
        self.sub_total - self.discount
    }

    /// Offers applied to the line
    pub fn applications(&self) -> &[OfferApplication] {
        &self.applications
    }
}

/// Price of a whole basket.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceResult {
    sub_total: Money<'static, Currency>,
    discount: Money<'static, Currency>,
    total: Money<'static, Currency>,
    lines: Vec<LinePrice>,
}

impl PriceResult {
    /// An all-zero result with no lines.
    pub fn empty(currency: &'static Currency) -> Self {
        Self {
            sub_total: Money::from_minor(0, currency),
            discount: Money::from_minor(0, currency),
            total: Money::from_minor(0, currency),
            lines: Vec::new(),
        }
    }

    /// Total before discounts
    pub fn sub_total(&self) -> Money<'static, Currency> {
        self.sub_total
    }

    /// Total discount
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }

    /// Amount to pay
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Per-line prices, in basket order
    pub fn lines(&self) -> &[LinePrice] {
        &self.lines
    }

    /// Currency of every amount in the result
    pub fn currency(&self) -> &'static Currency {
        self.total.currency()
    }
}

/// Prices baskets against a catalog and an offer index.
///
/// The optimizer decides how the best offer combination of each line is
/// found; [`ExhaustiveOptimizer`] is the default.
#[derive(Debug)]
pub struct BasketPriceCalculator<'c, C: Catalog, O: DiscountOptimizer = ExhaustiveOptimizer> {
    catalog: &'c C,
    resolver: OfferApplicabilityResolver<'c>,
    optimizer: PhantomData<O>,
}

impl<'c, C: Catalog> BasketPriceCalculator<'c, C> {
    /// Create a calculator using the exhaustive optimizer.
    pub fn new(catalog: &'c C, offers: &'c OfferIndex) -> Self {
        Self::with_optimizer(catalog, offers)
    }
}

impl<'c, C: Catalog, O: DiscountOptimizer> BasketPriceCalculator<'c, C, O> {
    /// Create a calculator using the optimizer `O`.
    pub fn with_optimizer(catalog: &'c C, offers: &'c OfferIndex) -> Self {
        Self {
            catalog,
            resolver: OfferApplicabilityResolver::new(offers),
            optimizer: PhantomData,
        }
    }

    /// Price a basket.
    ///
    /// Pricing is all-or-nothing: the first failing line aborts the basket.
    ///
    /// # Errors
    ///
    /// - [`PricingError::CurrencyMismatch`]: basket and catalog currencies differ.
    /// - [`PricingError::ProductNotFound`]: a line's product is not in the catalog.
    /// - any arithmetic or optimizer error from pricing a line.
    #[tracing::instrument(
        name = "calculate_price",
        skip_all,
        fields(lines = basket.len(), currency = basket.currency().iso_alpha_code)
    )]
    pub fn calculate(&self, basket: &Basket) -> Result<PriceResult, PricingError> {
        let currency = basket.currency();

        if currency != self.catalog.currency() {
            return Err(PricingError::CurrencyMismatch(
                currency.iso_alpha_code,
                self.catalog.currency().iso_alpha_code,
            ));
        }

        let lines = basket
            .iter()
            .map(|line| self.calculate_line(line))
            .collect::<Result<Vec<_>, _>>()?;

        let (sub_total, discount) =
            lines
                .iter()
                .try_fold((Decimal::ZERO, Decimal::ZERO), |(sub_total, discount), line| {
                    Ok::<_, PricingError>((
                        checked_sum(sub_total, line.sub_total, "basket subtotal")?,
                        checked_sum(discount, line.discount, "basket discount")?,
                    ))
                })?;

        let sub_total = round_to_minor(sub_total, currency)?;
        let discount = round_to_minor(discount, currency)?;
        let total = sub_total
            .checked_sub(discount)
            .ok_or_else(|| PricingError::Overflow("basket total".to_string()))?;

        debug!(sub_total, discount, total, "priced basket");

        Ok(PriceResult {
            sub_total: Money::from_minor(sub_total, currency),
            discount: Money::from_minor(discount, currency),
            total: Money::from_minor(total, currency),
            lines,
        })
    }

    /// Price a single basket line.
    ///
    /// # Errors
    ///
    /// - [`PricingError::ProductNotFound`]: the product is not in the catalog.
    /// - any arithmetic or optimizer error.
    pub fn calculate_line(&self, line: &BasketLine) -> Result<LinePrice, PricingError> {
        let product = line.product();

        let unit_price = self
            .catalog
            .unit_price(product)
            .ok_or_else(|| PricingError::ProductNotFound(product.to_string()))?;

        let sub_total = unit_price
            .checked_mul(Decimal::from(line.quantity()))
            .ok_or_else(|| PricingError::Overflow(product.to_string()))?;

        let applicable = self.resolver.applicable_offers(line);

        let best = if applicable.is_empty() {
            None
        } else {
            O::optimize(line.quantity(), &applicable, unit_price)?
        };

        let (mut discount, mut applications) = match best {
            Some(best) => (best.discount, offer_applications(&best, unit_price)?),
            None => (Decimal::ZERO, SmallVec::new()),
        };

        if discount > sub_total {
            warn!(
                product,
                %discount,
                %sub_total,
                "offer discount exceeds line subtotal, capping at subtotal"
            );

            discount = sub_total;
            cap_applications(&mut applications, sub_total);
        }

        debug!(
            product,
            quantity = line.quantity(),
            %sub_total,
            %discount,
            offers = applications.len(),
            "priced basket line"
        );

        Ok(LinePrice {
            product: product.to_string(),
            quantity: line.quantity(),
            unit_price,
            sub_total,
            discount,
            applications,
        })
    }
}

/// Price a basket with the exhaustive optimizer.
///
/// # Errors
///
/// See [`BasketPriceCalculator::calculate`].
pub fn calculate_price(
    basket: &Basket,
    catalog: &impl Catalog,
    offers: &OfferIndex,
) -> Result<PriceResult, PricingError> {
    BasketPriceCalculator::new(catalog, offers).calculate(basket)
}

fn offer_applications(
    best: &BestCombination<'_>,
    unit_price: Decimal,
) -> Result<SmallVec<[OfferApplication; 2]>, PricingError> {
    best.combination
        .applications()
        .into_iter()
        .map(|(offer, times)| {
            let discount = discount_for(offer, unit_price)?
                .checked_mul(Decimal::from(times))
                .ok_or_else(|| PricingError::Overflow(offer.product().to_string()))?;

            Ok(OfferApplication {
                offer: offer.clone(),
                times,
                discount,
            })
        })
        .collect()
}

/// Cap application discounts in order so they sum to at most `limit`.
fn cap_applications(applications: &mut [OfferApplication], limit: Decimal) {
    let mut remaining = limit;

    for application in applications {
        application.discount = application.discount.min(remaining);
        remaining -= application.discount;
    }
}

fn checked_sum(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, PricingError> {
    a.checked_add(b)
        .ok_or_else(|| PricingError::Overflow(what.to_string()))
}

/// Round a major-unit amount to whole minor units of `currency`, half away
/// from zero.
///
/// # Errors
///
/// Returns [`PricingError::MinorUnitsNotRepresentable`] if the result does not
/// fit in an `i64`.
pub fn round_to_minor(amount: Decimal, currency: &Currency) -> Result<i64, PricingError> {
    let exponent = currency.exponent;

    10_i64
        .checked_pow(exponent)
        .map(Decimal::from)
        .and_then(|factor| {
            amount
                .round_dp_with_strategy(exponent, RoundingStrategy::MidpointAwayFromZero)
                .checked_mul(factor)
        })
        .and_then(|minor| minor.to_i64())
        .ok_or(PricingError::MinorUnitsNotRepresentable(amount))
}
