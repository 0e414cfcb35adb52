//! Price feed abstraction feeding samples into the engine.

use crate::domain::{Decimal, TimeMs};
use async_trait::async_trait;
use std::fmt;

pub mod csv_file;
pub mod mock;

pub use csv_file::CsvPriceSource;
pub use mock::MockPriceSource;

/// One market price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceSample {
    /// Feed timestamp; `None` means "stamp on arrival".
    pub time_ms: Option<TimeMs>,
    pub price: Decimal,
}

impl PriceSample {
    pub fn new(price: Decimal) -> Self {
        Self {
            time_ms: None,
            price,
        }
    }

    pub fn at(time_ms: TimeMs, price: Decimal) -> Self {
        Self {
            time_ms: Some(time_ms),
            price,
        }
    }
}

/// Source of price samples, returned in feed order.
#[async_trait]
pub trait PriceSource: Send + Sync + fmt::Debug {
    async fn fetch_prices(&self) -> Result<Vec<PriceSample>, DataSourceError>;
}

/// Error type for price source operations.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Underlying read failed (missing file, permissions).
    Io(String),
    /// Malformed row or unparsable price.
    ParseError(String),
    Other(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::Io(msg) => write!(f, "IO error: {}", msg),
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}
