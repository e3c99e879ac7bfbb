//! Exhaustive Optimizer
//!
//! Evaluates every maximal offer combination and keeps the best one. The
//! number of combinations grows quickly with both the number of possible
//! applications and the number of offers, so lines that allow more than
//! [`EXHAUSTIVE_APPLICATION_LIMIT`] applications, or whose enumeration would
//! step through more than [`EXHAUSTIVE_COMBINATION_BUDGET`] candidates, are
//! handed to the [`KnapsackOptimizer`], which returns the same maximum
//! discount.

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    discounts::discount_for_combination,
    offers::Offer,
    optimizers::{BestCombination, DiscountOptimizer, KnapsackOptimizer, OptimizerError},
    resolver::combinations_for,
};

/// Most offer applications a line may allow before the search is delegated.
pub const EXHAUSTIVE_APPLICATION_LIMIT: usize = 64;

/// Most candidate combinations a line may enumerate before the search is delegated.
pub const EXHAUSTIVE_COMBINATION_BUDGET: u64 = 100_000;

/// Brute-force search over maximal combinations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveOptimizer;

impl DiscountOptimizer for ExhaustiveOptimizer {
    fn optimize<'o>(
        quantity: u32,
        applicable: &[&'o Offer],
        unit_price: Decimal,
    ) -> Result<Option<BestCombination<'o>>, OptimizerError> {
        let combinations = combinations_for(quantity, applicable);

        let search_space = combinations.search_space();

        if combinations.max_size() > EXHAUSTIVE_APPLICATION_LIMIT
            || search_space > EXHAUSTIVE_COMBINATION_BUDGET
        {
            debug!(
                quantity,
                offers = applicable.len(),
                max_applications = combinations.max_size(),
                search_space,
                "offer search space too large, using knapsack optimizer"
            );

            return KnapsackOptimizer::optimize(quantity, applicable, unit_price);
        }

        let mut best: Option<BestCombination<'o>> = None;

        for combination in combinations {
            let discount = discount_for_combination(&combination, unit_price)?;

            if best.as_ref().is_none_or(|best| discount > best.discount) {
                best = Some(BestCombination {
                    combination,
                    discount,
                });
            }
        }

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use testresult::TestResult;

    use crate::offers::{FreeProductsOffer, PercentageDiscountOffer, offer};

    use super::*;

    #[test]
    fn picks_highest_discount_combination() -> TestResult {
        let three_for_two = offer(FreeProductsOffer::new("shampoo", 3, 1)?);
        let ten_percent = offer(PercentageDiscountOffer::new(
            "shampoo",
            2,
            Percentage::try_from("0.1")?,
        )?);

        let best = ExhaustiveOptimizer::optimize(
            6,
            &[&three_for_two, &ten_percent],
            Decimal::new(250, 2),
        )?
        .ok_or("expected a combination")?;

        assert_eq!(best.discount, Decimal::new(500, 2));
        assert_eq!(best.combination.len(), 2);
        assert_eq!(best.combination.covered_quantity(), 6);

        Ok(())
    }

    #[test]
    fn no_applicable_offers_is_none() -> TestResult {
        let best = ExhaustiveOptimizer::optimize(6, &[], Decimal::ONE)?;

        assert!(best.is_none());

        Ok(())
    }

    #[test]
    fn ties_keep_first_combination() -> TestResult {
        let two_for_one = offer(FreeProductsOffer::new("biscuits", 2, 1)?);
        let four_for_two = offer(FreeProductsOffer::new("biscuits", 4, 2)?);

        let best = ExhaustiveOptimizer::optimize(
            4,
            &[&two_for_one, &four_for_two],
            Decimal::new(120, 2),
        )?
        .ok_or("expected a combination")?;

        assert_eq!(best.discount, Decimal::new(240, 2));
        assert_eq!(
            best.combination.offers(),
            &[&four_for_two],
            "smaller combinations are enumerated first"
        );

        Ok(())
    }

    #[test]
    fn large_quantities_are_delegated() -> TestResult {
        let one_free = offer(FreeProductsOffer::new("baked_beans", 1, 1)?);
        let quantity = u32::try_from(EXHAUSTIVE_APPLICATION_LIMIT)? * 1000;

        let best = ExhaustiveOptimizer::optimize(quantity, &[&one_free], Decimal::new(99, 2))?
            .ok_or("expected a combination")?;

        assert_eq!(best.discount, Decimal::new(99, 2) * Decimal::from(quantity));

        Ok(())
    }

    #[test]
    fn many_offers_are_delegated() -> TestResult {
        let offers = (1..=8)
            .map(|required| -> TestResult<Offer> {
                Ok(offer(FreeProductsOffer::new("baked_beans", required, 1)?))
            })
            .collect::<TestResult<Vec<_>>>()?;
        let applicable: Vec<&Offer> = offers.iter().collect();
        let quantity = u32::try_from(EXHAUSTIVE_APPLICATION_LIMIT)?;
        let unit_price = Decimal::new(99, 2);

        assert!(
            combinations_for(quantity, &applicable).search_space()
                > EXHAUSTIVE_COMBINATION_BUDGET,
            "eight offers over 64 units should exceed the combination budget"
        );

        let exhaustive = ExhaustiveOptimizer::optimize(quantity, &applicable, unit_price)?
            .ok_or("expected a combination")?;
        let knapsack = KnapsackOptimizer::optimize(quantity, &applicable, unit_price)?
            .ok_or("expected a combination")?;

        // 64 applications of buy 1 get 1 free
        assert_eq!(exhaustive.discount, knapsack.discount);
        assert_eq!(exhaustive.discount, unit_price * Decimal::from(quantity));

        Ok(())
    }
}
