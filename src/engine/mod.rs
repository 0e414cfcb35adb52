//! Pure, synchronous grid simulation.
//!
//! `arithmetic` and `validation` are leaf helpers; `ladder` builds and seeds
//! the price levels; `grid` owns the state and processes ticks.

pub mod arithmetic;
pub mod grid;
pub mod ladder;
pub mod snapshot;
pub mod validation;

pub use arithmetic::TradeBreakdown;
pub use grid::{GridConfig, GridEngine};
pub use ladder::Ladder;
pub use snapshot::{EngineSnapshot, LevelView};
