//! Knapsack Optimizer
//!
//! Treats a line as an unbounded knapsack: the line quantity is the capacity,
//! each offer application weighs its required quantity and is worth its
//! discount. Runs in `O(quantity * offers)` time.
//!
//! Quantities above [`KNAPSACK_CAPACITY_LIMIT`] are first reduced by applying
//! the offer with the best discount per unit in bulk. Some optimal solution
//! uses fewer than `w_best` applications of the other offers, so the reduction
//! is exact as long as the remaining capacity exceeds `w_best * w_max`.

use rust_decimal::Decimal;
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    discounts::{discount_for, discount_for_combination},
    offers::Offer,
    optimizers::{BestCombination, DiscountOptimizer, OptimizerError},
    resolver::OfferCombination,
};

/// Largest capacity solved directly by the dynamic program.
pub const KNAPSACK_CAPACITY_LIMIT: u32 = 1_000_000;

/// Dynamic-programming search for the maximum discount.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnapsackOptimizer;

/// An applicable offer with its weight and per-application value.
#[derive(Debug, Clone, Copy)]
struct Candidate<'o> {
    offer: &'o Offer,
    weight: u32,
    value: Decimal,
}

impl DiscountOptimizer for KnapsackOptimizer {
    fn optimize<'o>(
        quantity: u32,
        applicable: &[&'o Offer],
        unit_price: Decimal,
    ) -> Result<Option<BestCombination<'o>>, OptimizerError> {
        let candidates = applicable
            .iter()
            .map(|&offer| {
                Ok(Candidate {
                    offer,
                    weight: offer.required_quantity(),
                    value: discount_for(offer, unit_price)?,
                })
            })
            .collect::<Result<SmallVec<[Candidate<'o>; 4]>, OptimizerError>>()?;

        let Some(smallest) = candidates.iter().min_by_key(|candidate| candidate.weight) else {
            return Ok(None);
        };

        if quantity < smallest.weight {
            return Ok(None);
        }

        let (mut combination, capacity) = bulk_reduce(quantity, &candidates)?;

        for offer in solve(capacity, &candidates)? {
            combination.push(offer);
        }

        top_up(&mut combination, quantity, smallest);

        let discount = discount_for_combination(&combination, unit_price)?;

        Ok(Some(BestCombination {
            combination,
            discount,
        }))
    }
}

/// Apply the best value-per-unit offer in bulk until the capacity is small
/// enough for the dynamic program.
fn bulk_reduce<'o>(
    quantity: u32,
    candidates: &[Candidate<'o>],
) -> Result<(OfferCombination<'o>, u32), OptimizerError> {
    if quantity <= KNAPSACK_CAPACITY_LIMIT {
        return Ok((OfferCombination::default(), quantity));
    }

    let best = candidates
        .iter()
        .max_by(|a, b| {
            (a.value * Decimal::from(b.weight))
                .cmp(&(b.value * Decimal::from(a.weight)))
                .then(b.weight.cmp(&a.weight))
        })
        .ok_or(OptimizerError::InvariantViolation {
            message: "bulk reduction requires at least one candidate",
        })?;

    let heaviest = candidates
        .iter()
        .map(|candidate| candidate.weight)
        .max()
        .unwrap_or(best.weight);

    let reserve = u64::from(best.weight) * u64::from(heaviest) + u64::from(best.weight);

    if reserve > u64::from(KNAPSACK_CAPACITY_LIMIT) {
        return Err(OptimizerError::SearchSpaceTooLarge { quantity });
    }

    let bulk = (quantity - KNAPSACK_CAPACITY_LIMIT).div_ceil(best.weight);
    let capacity = quantity - bulk * best.weight;

    debug!(
        quantity,
        bulk_applications = bulk,
        remaining_capacity = capacity,
        "reduced knapsack capacity"
    );

    let mut combination = OfferCombination::default();

    for _ in 0..bulk {
        combination.push(best.offer);
    }

    Ok((combination, capacity))
}

/// Unbounded knapsack over `capacity` units, returning the chosen applications.
fn solve<'o>(
    capacity: u32,
    candidates: &[Candidate<'o>],
) -> Result<SmallVec<[&'o Offer; 8]>, OptimizerError> {
    let size = usize::try_from(capacity).map_err(|_err| OptimizerError::InvariantViolation {
        message: "knapsack capacity does not fit in memory",
    })?;

    // best[c] is the highest value reachable within c units; choice[c] is the
    // candidate taken last to reach it, or `None` when c - 1 units do as well.
    let mut best: Vec<Decimal> = Vec::with_capacity(size + 1);
    let mut choice: Vec<Option<usize>> = Vec::with_capacity(size + 1);

    best.push(Decimal::ZERO);
    choice.push(None);

    for units in 1..=size {
        let mut value = best.last().copied().unwrap_or(Decimal::ZERO);
        let mut taken = None;

        for (idx, candidate) in candidates.iter().enumerate() {
            let Some(rest) = units.checked_sub(weight_of(candidate)) else {
                continue;
            };

            let Some(reachable) = best
                .get(rest)
                .and_then(|rest_value| rest_value.checked_add(candidate.value))
            else {
                continue;
            };

            if reachable > value {
                value = reachable;
                taken = Some(idx);
            }
        }

        best.push(value);
        choice.push(taken);
    }

    let mut chosen = SmallVec::new();
    let mut units = size;

    while units > 0 {
        let taken = choice
            .get(units)
            .ok_or(OptimizerError::InvariantViolation {
                message: "knapsack reconstruction left the table",
            })?;

        match taken.and_then(|idx| candidates.get(idx)) {
            Some(candidate) => {
                chosen.push(candidate.offer);
                units = units.saturating_sub(weight_of(candidate));
            }
            None => units -= 1,
        }
    }

    Ok(chosen)
}

fn weight_of(candidate: &Candidate<'_>) -> usize {
    usize::try_from(candidate.weight).unwrap_or(usize::MAX)
}

/// Add applications of the smallest offer until no further application fits.
///
/// Only zero-value offers can be left out by the search, so this never changes
/// the discount.
fn top_up<'o>(combination: &mut OfferCombination<'o>, quantity: u32, smallest: &Candidate<'o>) {
    let weight = u64::from(smallest.weight);
    let mut covered = combination.covered_quantity();

    while u64::from(quantity) - covered >= weight {
        combination.push(smallest.offer);
        covered += weight;
    }
}
