//! Trade record produced by every executed conversion.

use crate::domain::{Decimal, Side, TimeMs};
use serde::{Deserialize, Serialize};

/// A single executed level conversion. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Time of execution in milliseconds since Unix epoch.
    pub time_ms: TimeMs,
    pub side: Side,
    /// Ladder price of the level that executed.
    pub level_price: Decimal,
    /// Price after slippage, rounded down to the price precision.
    pub execution_price: Decimal,
    /// Base asset moved.
    pub quantity: Decimal,
    /// Quote asset moved.
    pub quote_amount: Decimal,
    /// Fee paid: base units on a buy, quote units on a sell.
    pub fee_paid: Decimal,
    pub note: String,
}

impl TradeRecord {
    /// Absolute price degradation against the level price.
    pub fn slippage(&self) -> Decimal {
        (self.execution_price - self.level_price).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn record(side: Side, level_price: &str, execution_price: &str) -> TradeRecord {
        TradeRecord {
            time_ms: TimeMs::new(1000),
            side,
            level_price: d(level_price),
            execution_price: d(execution_price),
            quantity: d("1"),
            quote_amount: d("100"),
            fee_paid: Decimal::zero(),
            note: String::new(),
        }
    }

    #[test]
    fn test_slippage_is_absolute_for_both_sides() {
        assert_eq!(record(Side::Buy, "100", "100.2").slippage(), d("0.2"));
        assert_eq!(record(Side::Sell, "100", "99.8").slippage(), d("0.2"));
        assert_eq!(record(Side::Sell, "100", "100").slippage(), Decimal::zero());
    }

    #[test]
    fn test_trade_record_json_shape() {
        let json = serde_json::to_value(record(Side::Buy, "100", "100.2")).unwrap();
        assert_eq!(json["side"], "buy");
        assert_eq!(json["time_ms"], 1000);
        assert_eq!(json["execution_price"], "100.2");
    }
}
