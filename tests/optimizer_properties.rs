//! Properties shared by both optimizers, checked against the full
//! enumeration of maximal offer combinations.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use testresult::TestResult;

use basket_pricer::{
    discounts::discount_for_combination,
    offers::{FreeProductsOffer, Offer, PercentageDiscountOffer, offer},
    optimizers::{DiscountOptimizer, ExhaustiveOptimizer, KnapsackOptimizer},
    resolver::combinations_for,
};

fn offer_mixes() -> TestResult<Vec<Vec<Offer>>> {
    Ok(vec![
        vec![offer(FreeProductsOffer::new("shampoo", 3, 1)?)],
        vec![
            offer(FreeProductsOffer::new("shampoo", 3, 1)?),
            offer(PercentageDiscountOffer::new(
                "shampoo",
                2,
                Percentage::try_from("0.1")?,
            )?),
        ],
        vec![
            offer(FreeProductsOffer::new("shampoo", 4, 1)?),
            offer(FreeProductsOffer::new("shampoo", 5, 2)?),
            offer(PercentageDiscountOffer::new(
                "shampoo",
                1,
                Percentage::try_from("0.05")?,
            )?),
        ],
        vec![
            offer(PercentageDiscountOffer::new(
                "shampoo",
                3,
                Percentage::try_from("0.5")?,
            )?),
            offer(PercentageDiscountOffer::new(
                "shampoo",
                7,
                Percentage::try_from("1")?,
            )?),
        ],
    ])
}

#[test]
fn optimizers_find_the_largest_enumerated_discount() -> TestResult {
    let unit_price = Decimal::new(250, 2);

    for offers in offer_mixes()? {
        let applicable: Vec<&Offer> = offers.iter().collect();

        for quantity in 0..=24 {
            let enumerated = combinations_for(quantity, &applicable)
                .map(|combination| discount_for_combination(&combination, unit_price))
                .collect::<Result<Vec<_>, _>>()?;

            let expected = enumerated.iter().copied().max();

            let exhaustive = ExhaustiveOptimizer::optimize(quantity, &applicable, unit_price)?
                .map(|best| best.discount);
            let knapsack = KnapsackOptimizer::optimize(quantity, &applicable, unit_price)?
                .map(|best| best.discount);

            assert_eq!(exhaustive, expected, "exhaustive, quantity {quantity}");
            assert_eq!(knapsack, expected, "knapsack, quantity {quantity}");
        }
    }

    Ok(())
}

#[test]
fn chosen_combinations_are_maximal() -> TestResult {
    let unit_price = Decimal::new(189, 2);

    for offers in offer_mixes()? {
        let applicable: Vec<&Offer> = offers.iter().collect();
        let smallest = applicable
            .iter()
            .map(|offer| u64::from(offer.required_quantity()))
            .min()
            .ok_or("offer mix is empty")?;

        for quantity in 1..=24 {
            for best in [
                ExhaustiveOptimizer::optimize(quantity, &applicable, unit_price)?,
                KnapsackOptimizer::optimize(quantity, &applicable, unit_price)?,
            ]
            .into_iter()
            .flatten()
            {
                let covered = best.combination.covered_quantity();

                assert!(covered <= u64::from(quantity), "quantity {quantity}");
                assert!(
                    u64::from(quantity) - covered < smallest,
                    "quantity {quantity} leaves room for another offer"
                );
            }
        }
    }

    Ok(())
}

#[test]
fn enumeration_order_is_by_size_then_offer_order() -> TestResult {
    let free = offer(FreeProductsOffer::new("shampoo", 3, 1)?);
    let percentage = offer(PercentageDiscountOffer::new(
        "shampoo",
        2,
        Percentage::try_from("0.1")?,
    )?);
    let applicable = [&free, &percentage];

    let combinations: Vec<Vec<&Offer>> = combinations_for(6, &applicable)
        .map(|combination| combination.offers().to_vec())
        .collect();

    assert_eq!(
        combinations,
        vec![
            vec![&free, &free],
            vec![&free, &percentage],
            vec![&percentage, &percentage, &percentage],
        ]
    );

    Ok(())
}

#[test]
fn no_combination_below_the_smallest_requirement() -> TestResult {
    let free = offer(FreeProductsOffer::new("shampoo", 3, 1)?);
    let applicable = [&free];

    assert_eq!(combinations_for(2, &applicable).count(), 0);
    assert!(ExhaustiveOptimizer::optimize(2, &applicable, Decimal::ONE)?.is_none());
    assert!(KnapsackOptimizer::optimize(2, &applicable, Decimal::ONE)?.is_none());

    Ok(())
}
