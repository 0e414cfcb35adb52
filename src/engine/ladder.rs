//! Geometric ladder generation and initial capital allocation.

use crate::domain::{Decimal, Level};
use crate::engine::validation::Bounds;
use crate::error::InvalidValue;

/// Levels in ascending price order plus the ratio that spaced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ladder {
    pub ratio: Decimal,
    pub levels: Vec<Level>,
}

/// Significant digits carried by the ratio and by every generated price.
const SIGNIFICANT_DIGITS: u32 = 28;

/// Refinement steps applied on top of the `powd` estimate.
const NEWTON_ITERATIONS: usize = 8;

/// Constant ratio between consecutive levels: `(upper/lower)^(1/(n-1))`.
///
/// `powd` only approximates fractional powers, so the estimate is refined
/// with Newton steps on `r^(n-1) = upper/lower` and rounded to 28
/// significant digits. Exact roots come out exact (`16^(1/4) = 2`).
pub fn geometric_ratio(bounds: &Bounds, num_levels: usize) -> Result<Decimal, InvalidValue> {
    let out_of_range = || {
        InvalidValue::new(
            "upper_price",
            format!(
                "ratio between {} and {} over {} levels is out of range",
                bounds.lower, bounds.upper, num_levels
            ),
        )
    };

    let steps = (num_levels - 1) as i64;
    let span = bounds.upper.checked_div(bounds.lower).ok_or_else(out_of_range)?;
    let mut ratio = span
        .checked_powd(Decimal::one() / Decimal::from_i64(steps))
        .ok_or_else(out_of_range)?;

    for _ in 0..NEWTON_ITERATIONS {
        let next = newton_step(ratio, span, steps).ok_or_else(out_of_range)?;
        if next == ratio {
            break;
        }
        ratio = next;
    }

    ratio
        .round_significant(SIGNIFICANT_DIGITS)
        .ok_or_else(out_of_range)
}

/// `((k-1)*r + span / r^(k-1)) / k`
fn newton_step(ratio: Decimal, span: Decimal, steps: i64) -> Option<Decimal> {
    let k = Decimal::from_i64(steps);
    let correction = span.checked_div(ratio.checked_powi(steps - 1)?)?;
    ratio
        .checked_mul(k - Decimal::one())?
        .checked_add(correction)?
        .checked_div(k)
}

/// `lower, lower*r, lower*r^2, ...`, unrounded beyond 28 significant digits.
pub fn geometric_prices(
    lower: Decimal,
    ratio: Decimal,
    num_levels: usize,
) -> Result<Vec<Decimal>, InvalidValue> {
    let mut prices = Vec::with_capacity(num_levels);
    let mut price = lower;
    for index in 0..num_levels {
        prices.push(price);
        if index + 1 < num_levels {
            price = price
                .checked_mul(ratio)
                .and_then(|next| next.round_significant(SIGNIFICANT_DIGITS))
                .ok_or_else(|| {
                    InvalidValue::new("num_levels", format!("level {} price overflows", index + 1))
                })?;
        }
    }
    Ok(prices)
}

/// Split `total` across `slots`, each slot taking the remaining amount divided
/// by the slots left, truncated to `precision`.
///
/// The last slot absorbs everything representable at `precision`; anything
/// finer is left unallocated.
pub fn allocate_evenly(total: Decimal, slots: usize, precision: u32) -> Vec<Decimal> {
    let mut remaining = total;
    (0..slots)
        .map(|index| {
            let levels_left = Decimal::from_i64((slots - index) as i64);
            let allocation = (remaining / levels_left)
                .round_down(precision)
                .min(remaining);
            remaining -= allocation;
            allocation
        })
        .collect()
}

/// Build the ladder and seed each level.
///
/// Levels at or below `initial + eps` start holding base and share
/// `base_balance` at quantity precision; levels above start holding quote and
/// share `quote_balance` at price precision.
pub fn build_ladder(
    bounds: &Bounds,
    num_levels: usize,
    base_balance: Decimal,
    quote_balance: Decimal,
    price_precision: u32,
    quantity_precision: u32,
    eps: Decimal,
) -> Result<Ladder, InvalidValue> {
    let ratio = geometric_ratio(bounds, num_levels)?;
    let prices = geometric_prices(bounds.lower, ratio, num_levels)?;

    let threshold = bounds.initial + eps;
    let base_count = prices.iter().filter(|p| **p <= threshold).count();
    let quote_count = prices.len() - base_count;

    let mut base_allocations =
        allocate_evenly(base_balance, base_count, quantity_precision).into_iter();
    let mut quote_allocations =
        allocate_evenly(quote_balance, quote_count, price_precision).into_iter();

    let levels = prices
        .iter()
        .map(|price| {
            let level_price = price.round_down(price_precision);
            if *price <= threshold {
                let position = base_allocations.next().unwrap_or_default();
                Level::holding_base(level_price, position)
            } else {
                let budget = quote_allocations.next().unwrap_or_default();
                Level::holding_quote(level_price, budget)
            }
        })
        .collect();

    Ok(Ladder { ratio, levels })
}
