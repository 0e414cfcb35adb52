//! Fee, slippage and conversion arithmetic.
//!
//! All functions are pure. Quantities are truncated to their precision so a
//! conversion never hands out more than it received. Anything that can leave
//! the representable range returns `None` instead of panicking.

use crate::domain::{Decimal, Side};

/// Result of a single conversion, consumed immediately by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeBreakdown {
    /// Price after slippage, rounded down to the price precision.
    pub effective_price: Decimal,
    /// Base asset moved.
    pub quantity: Decimal,
    /// Fee paid: base units on a buy, quote units on a sell.
    pub fee_paid: Decimal,
    /// Quote asset moved.
    pub quote_amount: Decimal,
}

/// Degrade `price` against the trader: up for a buy, down for a sell.
pub fn apply_slippage(price: Decimal, slippage_rate: Decimal, side: Side) -> Option<Decimal> {
    if slippage_rate <= Decimal::zero() {
        return Some(price);
    }

    let factor = match side {
        Side::Buy => Decimal::one() + slippage_rate,
        Side::Sell => Decimal::one() - slippage_rate,
    };
    price.checked_mul(factor)
}

/// `amount * fee_rate`; rates live in `[0, 1)` so this never exceeds `amount`.
pub fn calculate_fee(amount: Decimal, fee_rate: Decimal) -> Decimal {
    if fee_rate <= Decimal::zero() {
        return Decimal::zero();
    }
    amount * fee_rate
}

/// Convert `quote_amount` into base at `price`.
///
/// The fee is taken out of the base received rather than added to the cost.
/// Returns `None` when the base quantity overflows.
pub fn execute_buy(
    quote_amount: Decimal,
    price: Decimal,
    fee_rate: Decimal,
    slippage_rate: Decimal,
    quantity_precision: u32,
    price_precision: u32,
) -> Option<TradeBreakdown> {
    let effective_price = apply_slippage(price, slippage_rate, Side::Buy)?;
    let gross_quantity = quote_amount.checked_div(effective_price)?;
    let fee_paid = calculate_fee(gross_quantity, fee_rate);
    let quantity = (gross_quantity - fee_paid).round_down(quantity_precision);

    Some(TradeBreakdown {
        effective_price: effective_price.round_down(price_precision),
        quantity,
        fee_paid: fee_paid.round_down(quantity_precision),
        quote_amount: quote_amount.round_down(price_precision),
    })
}

/// Convert `base_amount` into quote at `price`, fee charged in quote.
///
/// Returns `None` when the quote proceeds overflow.
pub fn execute_sell(
    base_amount: Decimal,
    price: Decimal,
    fee_rate: Decimal,
    slippage_rate: Decimal,
    quantity_precision: u32,
    price_precision: u32,
) -> Option<TradeBreakdown> {
    let base_amount = base_amount.round_down(quantity_precision);
    let effective_price = apply_slippage(price, slippage_rate, Side::Sell)?;
    let gross_quote = base_amount.checked_mul(effective_price)?;
    let fee_paid = calculate_fee(gross_quote, fee_rate);
    let quote_amount = (gross_quote - fee_paid).round_down(price_precision);

    Some(TradeBreakdown {
        effective_price: effective_price.round_down(price_precision),
        quantity: base_amount,
        fee_paid: fee_paid.round_down(price_precision),
        quote_amount,
    })
}
