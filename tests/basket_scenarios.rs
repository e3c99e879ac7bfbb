//! Pricing scenarios over the grocery catalog.
//!
//! Catalog: shampoo £2.50, shampoo_large £3.50, baked_beans £0.99,
//! biscuits £1.20, sardines £1.89.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{Currency, GBP},
};
use testresult::TestResult;

use basket_pricer::prelude::*;

fn catalog() -> TestResult<ProductCatalog<'static>> {
    Ok(ProductCatalog::with_products(
        [
            Product::new("shampoo", Money::from_minor(250, GBP)),
            Product::new("shampoo_large", Money::from_minor(350, GBP)),
            Product::new("baked_beans", Money::from_minor(99, GBP)),
            Product::new("biscuits", Money::from_minor(120, GBP)),
            Product::new("sardines", Money::from_minor(189, GBP)),
        ],
        GBP,
    )?)
}

fn basket(lines: &[(&str, u32)]) -> TestResult<Basket> {
    let lines = lines
        .iter()
        .map(|&(product, quantity)| BasketLine::new(product, quantity))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Basket::with_lines(lines, GBP)?)
}

fn gbp(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, GBP)
}

fn assert_totals(result: &PriceResult, sub_total: i64, discount: i64, total: i64) {
    assert_eq!(result.sub_total(), gbp(sub_total), "sub total");
    assert_eq!(result.discount(), gbp(discount), "discount");
    assert_eq!(result.total(), gbp(total), "total");
}

fn three_for_two(product: &str) -> TestResult<Offer> {
    Ok(offer(FreeProductsOffer::new(product, 3, 1)?))
}

#[test]
fn single_item_without_offers() -> TestResult {
    let result = calculate_price(&basket(&[("shampoo", 1)])?, &catalog()?, &OfferIndex::default())?;

    assert_totals(&result, 250, 0, 250);

    Ok(())
}

#[test]
fn three_for_two_applies_once() -> TestResult {
    let offers = OfferIndex::new([three_for_two("shampoo")?]);

    let result = calculate_price(&basket(&[("shampoo", 3)])?, &catalog()?, &offers)?;

    assert_totals(&result, 750, 250, 500);

    Ok(())
}

#[test]
fn three_for_two_applies_twice() -> TestResult {
    let offers = OfferIndex::new([three_for_two("shampoo")?]);

    let result = calculate_price(&basket(&[("shampoo", 6)])?, &catalog()?, &offers)?;

    assert_totals(&result, 1500, 500, 1000);

    Ok(())
}

#[test]
fn remainder_is_paid_in_full() -> TestResult {
    let offers = OfferIndex::new([three_for_two("shampoo")?]);

    let result = calculate_price(&basket(&[("shampoo", 8)])?, &catalog()?, &offers)?;

    assert_totals(&result, 2000, 500, 1500);

    Ok(())
}

#[test]
fn offers_only_touch_their_own_product() -> TestResult {
    let offers = OfferIndex::new([three_for_two("baked_beans")?]);

    let result = calculate_price(
        &basket(&[("baked_beans", 4), ("biscuits", 1)])?,
        &catalog()?,
        &offers,
    )?;

    assert_totals(&result, 516, 99, 417);

    let [beans, biscuits] = result.lines() else {
        return Err("expected two lines".into());
    };

    assert_eq!(beans.discount(), Decimal::new(99, 2));
    assert_eq!(biscuits.discount(), Decimal::ZERO);
    assert!(biscuits.applications().is_empty());

    Ok(())
}

#[test]
fn empty_basket_is_free() -> TestResult {
    let offers = OfferIndex::new([three_for_two("shampoo")?]);

    let result = calculate_price(&Basket::new(GBP), &catalog()?, &offers)?;

    assert_totals(&result, 0, 0, 0);
    assert!(result.lines().is_empty());

    Ok(())
}

#[test]
fn best_of_competing_offers_wins() -> TestResult {
    let offers = OfferIndex::new([
        three_for_two("shampoo")?,
        offer(PercentageDiscountOffer::new(
            "shampoo",
            2,
            Percentage::try_from("0.1")?,
        )?),
    ]);

    // (F,F) = 5.00 beats (F,P) = 2.75 and (P,P,P) = 0.75
    let result = calculate_price(&basket(&[("shampoo", 6)])?, &catalog()?, &offers)?;

    assert_totals(&result, 1500, 500, 1000);

    let [line] = result.lines() else {
        return Err("expected one line".into());
    };
    let [application] = line.applications() else {
        return Err("expected one offer applied".into());
    };

    assert_eq!(application.times, 2);
    assert!(matches!(application.offer, Offer::FreeProducts(_)));

    Ok(())
}

#[test]
fn percentage_offers_combine_across_lines() -> TestResult {
    let offers = OfferIndex::new([
        offer(PercentageDiscountOffer::new(
            "sardines",
            1,
            Percentage::try_from("0.25")?,
        )?),
        three_for_two("shampoo_large")?,
    ]);

    let result = calculate_price(
        &basket(&[("sardines", 2), ("shampoo_large", 3), ("biscuits", 2)])?,
        &catalog()?,
        &offers,
    )?;

    // 3.78 + 10.50 + 2.40; 0.945 + 3.50 = 4.445 rounds to 4.45
    assert_totals(&result, 1668, 445, 1223);

    Ok(())
}

#[test]
fn unknown_product_fails_the_basket() -> TestResult {
    let result = calculate_price(
        &basket(&[("shampoo", 1), ("caviar", 1)])?,
        &catalog()?,
        &OfferIndex::default(),
    );

    assert_eq!(result, Err(PricingError::ProductNotFound("caviar".into())));

    Ok(())
}

#[test]
fn pricing_leaves_inputs_untouched() -> TestResult {
    let catalog = catalog()?;
    let offers = OfferIndex::new([three_for_two("shampoo")?]);
    let basket = basket(&[("shampoo", 7), ("sardines", 1)])?;
    let before = basket.clone();

    let calculator = BasketPriceCalculator::new(&catalog, &offers);

    let first = calculator.calculate(&basket)?;
    let second = calculator.calculate(&basket)?;

    assert_eq!(first, second);
    assert_eq!(basket, before);
    assert_eq!(offers.len(), 1);

    Ok(())
}
