//! Domain types for the grid simulator.
//!
//! This module provides:
//! - Exact numeric handling via the Decimal wrapper
//! - Domain primitives: TimeMs, Asset, Side
//! - Level holdings as a closed enum
//! - Trade records appended by the engine

pub mod decimal;
pub mod level;
pub mod primitives;
pub mod trade;

pub use decimal::{to_exact, Decimal, MAX_PRECISION};
pub use level::{Holding, LastAction, Level, LevelStatus};
pub use primitives::{Asset, Side, TimeMs};
pub use trade::TradeRecord;
