use crate::datasource::{DataSourceError, PriceSource};
use crate::domain::{Decimal, TimeMs};
use crate::engine::GridEngine;
use crate::error::GridError;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// What to do when a tick returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickErrorPolicy {
    /// Stop the replay and return the error. Earlier ticks stay applied.
    #[default]
    Abort,
    /// Log the error and continue with the next sample.
    Skip,
}

impl FromStr for TickErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(TickErrorPolicy::Abort),
            "skip" => Ok(TickErrorPolicy::Skip),
            other => Err(format!("must be abort or skip, got {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    pub ticks_processed: usize,
    pub ticks_skipped: usize,
    /// Trades appended to history, including those committed by a tick that
    /// later failed.
    pub trades_executed: usize,
}

/// Feeds every sample of a price source through an engine, in order.
#[derive(Debug, Clone)]
pub struct Replayer {
    source: Arc<dyn PriceSource>,
    policy: TickErrorPolicy,
}

impl Replayer {
    pub fn new(source: Arc<dyn PriceSource>, policy: TickErrorPolicy) -> Self {
        Self { source, policy }
    }

    pub async fn run(&self, engine: &mut GridEngine) -> Result<ReplaySummary, ReplayError> {
        let samples = self.source.fetch_prices().await?;
        let history_before = engine.trade_history().len();
        let mut summary = ReplaySummary::default();

        for (index, sample) in samples.iter().enumerate() {
            let time_ms = sample.time_ms.unwrap_or_else(TimeMs::now);
            match engine.on_price_tick_at(sample.price, time_ms) {
                Ok(_) => summary.ticks_processed += 1,
                Err(err) => match self.policy {
                    TickErrorPolicy::Abort => {
                        return Err(ReplayError::Tick {
                            index,
                            price: sample.price,
                            source: err,
                        });
                    }
                    TickErrorPolicy::Skip => {
                        tracing::warn!("Skipping tick {} at price {}: {}", index, sample.price, err);
                        summary.ticks_skipped += 1;
                    }
                },
            }
        }

        summary.trades_executed = engine.trade_history().len() - history_before;

        tracing::info!(
            "Replay finished: {} ticks processed, {} skipped, {} trades; balances {} {} / {} {}",
            summary.ticks_processed,
            summary.ticks_skipped,
            summary.trades_executed,
            engine.base_balance(),
            engine.base_asset(),
            engine.quote_balance(),
            engine.quote_asset()
        );

        Ok(summary)
    }
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Source(#[from] DataSourceError),
    #[error("tick {index} at price {price} failed: {source}")]
    Tick {
        index: usize,
        price: Decimal,
        source: GridError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("abort".parse::<TickErrorPolicy>(), Ok(TickErrorPolicy::Abort));
        assert_eq!(" SKIP ".parse::<TickErrorPolicy>(), Ok(TickErrorPolicy::Skip));
        assert!("retry".parse::<TickErrorPolicy>().is_err());
        assert_eq!(TickErrorPolicy::default(), TickErrorPolicy::Abort);
    }
}
