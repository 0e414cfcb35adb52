//! Mock price source for testing without touching the filesystem.

use super::{DataSourceError, PriceSample, PriceSource};
use crate::domain::{Decimal, TimeMs};
use async_trait::async_trait;

/// Mock price source that returns predefined samples in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MockPriceSource {
    samples: Vec<PriceSample>,
    failure: Option<String>,
}

impl MockPriceSource {
    /// Create a new mock price source with no samples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unstamped price.
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.samples.push(PriceSample::new(price));
        self
    }

    /// Add several unstamped prices.
    pub fn with_prices(mut self, prices: impl IntoIterator<Item = Decimal>) -> Self {
        self.samples.extend(prices.into_iter().map(PriceSample::new));
        self
    }

    /// Add a price carrying its own timestamp.
    pub fn with_sample_at(mut self, time_ms: TimeMs, price: Decimal) -> Self {
        self.samples.push(PriceSample::at(time_ms, price));
        self
    }

    /// Make `fetch_prices` fail with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn fetch_prices(&self) -> Result<Vec<PriceSample>, DataSourceError> {
        if let Some(message) = &self.failure {
            return Err(DataSourceError::Other(message.clone()));
        }
        Ok(self.samples.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[tokio::test]
    async fn test_mock_source_preserves_order() {
        let mock = MockPriceSource::new()
            .with_price(d("100"))
            .with_prices(vec![d("101"), d("99")])
            .with_sample_at(TimeMs::new(42), d("98"));

        let samples = mock.fetch_prices().await.unwrap();
        let prices: Vec<Decimal> = samples.iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![d("100"), d("101"), d("99"), d("98")]);
        assert_eq!(samples[3].time_ms, Some(TimeMs::new(42)));
    }

    #[tokio::test]
    async fn test_mock_source_failure() {
        let mock = MockPriceSource::new().failing("feed down");
        let err = mock.fetch_prices().await.unwrap_err();
        assert_eq!(err.to_string(), "Error: feed down");
    }
}
