pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod store;

pub use config::{Config, ConfigError};
pub use datasource::{
    CsvPriceSource, DataSourceError, MockPriceSource, PriceSample, PriceSource,
};
pub use domain::{Asset, Decimal, Level, LevelStatus, Side, TimeMs, TradeRecord};
pub use engine::{EngineSnapshot, GridConfig, GridEngine};
pub use error::{BalanceError, GridError, InvalidValue};
pub use orchestration::{ReplayError, ReplaySummary, Replayer, TickErrorPolicy};
pub use store::{SnapshotStore, StoreError};
