//! Read-only projection of engine state.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{Asset, Decimal, LastAction, Level, LevelStatus, TradeRecord};

use super::GridEngine;

/// One level as seen from outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelView {
    pub price: Decimal,
    pub status: LevelStatus,
    pub quote_budget: Decimal,
    pub base_position: Decimal,
    pub last_action: Option<LastAction>,
}

impl From<&Level> for LevelView {
    fn from(level: &Level) -> Self {
        Self {
            price: level.price,
            status: level.status(),
            quote_budget: level.quote_budget(),
            base_position: level.base_position(),
            last_action: level.last_action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub base_asset: Asset,
    pub quote_asset: Asset,
    pub base_balance: Decimal,
    pub quote_balance: Decimal,
    pub ratio: Decimal,
    pub levels: Vec<LevelView>,
    pub trade_history: Vec<TradeRecord>,
}

impl EngineSnapshot {
    pub(crate) fn capture(engine: &GridEngine) -> Self {
        Self {
            base_asset: engine.base_asset().clone(),
            quote_asset: engine.quote_asset().clone(),
            base_balance: engine.base_balance(),
            quote_balance: engine.quote_balance(),
            ratio: engine.ratio(),
            levels: engine.levels().iter().map(LevelView::from).collect(),
            trade_history: engine.trade_history().to_vec(),
        }
    }

    /// Hex SHA-256 of the snapshot's JSON form.
    ///
    /// Trade timestamps are part of the hash, so two runs only match when
    /// they were fed the same timestamps.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        let hash = Sha256::digest(&bytes);
        Ok(hex::encode(hash))
    }
}
