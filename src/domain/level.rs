//! Grid level: one price point on the ladder and the capital it holds.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// What a level currently holds.
///
/// A level holds either quote budget waiting to buy or base inventory waiting
/// to sell, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Holding {
    /// Quote reserved to buy at this level.
    HoldingQuote { budget: Decimal },
    /// Base reserved to sell at this level.
    HoldingBase { position: Decimal },
}

/// Tag-only view of [`Holding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStatus {
    HoldingQuote,
    HoldingBase,
}

/// Last conversion executed at a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastAction {
    Bought,
    Sold,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Ladder price, rounded down to the price precision.
    pub price: Decimal,
    pub holding: Holding,
    pub last_action: Option<LastAction>,
}

impl Level {
    pub fn holding_quote(price: Decimal, budget: Decimal) -> Self {
        Self {
            price,
            holding: Holding::HoldingQuote { budget },
            last_action: None,
        }
    }

    pub fn holding_base(price: Decimal, position: Decimal) -> Self {
        Self {
            price,
            holding: Holding::HoldingBase { position },
            last_action: None,
        }
    }

    pub fn status(&self) -> LevelStatus {
        match self.holding {
            Holding::HoldingQuote { .. } => LevelStatus::HoldingQuote,
            Holding::HoldingBase { .. } => LevelStatus::HoldingBase,
        }
    }

    /// Quote budget, zero unless holding quote.
    pub fn quote_budget(&self) -> Decimal {
        match self.holding {
            Holding::HoldingQuote { budget } => budget,
            Holding::HoldingBase { .. } => Decimal::zero(),
        }
    }

    /// Base position, zero unless holding base.
    pub fn base_position(&self) -> Decimal {
        match self.holding {
            Holding::HoldingBase { position } => position,
            Holding::HoldingQuote { .. } => Decimal::zero(),
        }
    }

    pub fn is_holding_quote(&self) -> bool {
        matches!(self.holding, Holding::HoldingQuote { .. })
    }

    pub fn is_holding_base(&self) -> bool {
        matches!(self.holding, Holding::HoldingBase { .. })
    }

    /// Flip to holding base after a buy filled `quantity`.
    pub(crate) fn mark_bought(&mut self, quantity: Decimal) {
        self.holding = Holding::HoldingBase { position: quantity };
        self.last_action = Some(LastAction::Bought);
    }

    /// Flip to holding quote after a sell returned `quote_amount`.
    pub(crate) fn mark_sold(&mut self, quote_amount: Decimal) {
        self.holding = Holding::HoldingQuote {
            budget: quote_amount,
        };
        self.last_action = Some(LastAction::Sold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_quote_level_reports_budget_only() {
        let level = Level::holding_quote(d("110"), d("500"));
        assert_eq!(level.status(), LevelStatus::HoldingQuote);
        assert_eq!(level.quote_budget(), d("500"));
        assert_eq!(level.base_position(), Decimal::zero());
        assert_eq!(level.last_action, None);
    }

    #[test]
    fn test_flip_cycle_updates_status_and_last_action() {
        let mut level = Level::holding_quote(d("110"), d("500"));

        level.mark_bought(d("4.5"));
        assert!(level.is_holding_base());
        assert_eq!(level.base_position(), d("4.5"));
        assert_eq!(level.quote_budget(), Decimal::zero());
        assert_eq!(level.last_action, Some(LastAction::Bought));

        level.mark_sold(d("495"));
        assert!(level.is_holding_quote());
        assert_eq!(level.quote_budget(), d("495"));
        assert_eq!(level.base_position(), Decimal::zero());
        assert_eq!(level.last_action, Some(LastAction::Sold));
    }

    #[test]
    fn test_holding_serializes_with_status_tag() {
        let json = serde_json::to_value(Holding::HoldingBase {
            position: d("0.5"),
        })
        .unwrap();
        assert_eq!(json["status"], "holding_base");
        assert_eq!(json["position"], "0.5");
    }
}
