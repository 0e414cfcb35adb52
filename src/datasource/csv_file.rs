//! CSV price file reader.
//!
//! Expects a header row with a `price` column and an optional `time_ms`
//! column; other columns are ignored.

use super::{DataSourceError, PriceSample, PriceSource};
use crate::domain::{Decimal, TimeMs};
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn parse_csv(csv_bytes: &[u8]) -> Result<Vec<PriceSample>, DataSourceError> {
        #[derive(Debug, serde::Deserialize)]
        struct Row {
            #[serde(default)]
            time_ms: Option<i64>,
            price: String,
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(csv_bytes);

        let mut samples = Vec::new();
        for (line, record) in reader.deserialize::<Row>().enumerate() {
            let row = record.map_err(|e| DataSourceError::ParseError(e.to_string()))?;
            let price = Decimal::from_str_canonical(&row.price).map_err(|e| {
                DataSourceError::ParseError(format!(
                    "invalid price {:?} on row {}: {}",
                    row.price,
                    line + 1,
                    e
                ))
            })?;

            samples.push(PriceSample {
                time_ms: row.time_ms.map(TimeMs::new),
                price,
            });
        }

        Ok(samples)
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    async fn fetch_prices(&self) -> Result<Vec<PriceSample>, DataSourceError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            DataSourceError::Io(format!("{}: {}", self.path.display(), e))
        })?;
        Self::parse_csv(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn csv_parsing_with_timestamps() {
        let csv = b"time_ms,price\n1700000000000,101.25\n1700000001000,99.5\n";
        let samples = CsvPriceSource::parse_csv(csv).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].time_ms, Some(TimeMs::new(1_700_000_000_000)));
        assert_eq!(samples[0].price, d("101.25"));
        assert_eq!(samples[1].price, d("99.5"));
    }

    #[test]
    fn csv_parsing_price_only_column() {
        let csv = b"price\n100\n 0.1 \n";
        let samples = CsvPriceSource::parse_csv(csv).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].time_ms, None);
        assert_eq!(samples[1].price, d("0.1"));
    }

    #[test]
    fn csv_parsing_keeps_non_positive_prices_for_the_engine_to_reject() {
        let csv = b"price\n0\n-3\n";
        let samples = CsvPriceSource::parse_csv(csv).unwrap();
        assert_eq!(samples[0].price, Decimal::zero());
        assert_eq!(samples[1].price, d("-3"));
    }

    #[test]
    fn csv_parsing_invalid_price_errors() {
        let csv = b"time_ms,price\n1,abc\n";
        let err = CsvPriceSource::parse_csv(csv).unwrap_err();
        assert!(matches!(err, DataSourceError::ParseError(_)));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn csv_parsing_missing_price_column_errors() {
        let csv = b"time_ms,close\n1,100\n";
        let err = CsvPriceSource::parse_csv(csv).unwrap_err();
        assert!(matches!(err, DataSourceError::ParseError(_)));
    }

    #[tokio::test]
    async fn fetch_prices_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"price\n100\n101\n").unwrap();

        let source = CsvPriceSource::new(file.path());
        let samples = source.fetch_prices().await.unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].price, d("101"));
    }

    #[tokio::test]
    async fn fetch_prices_missing_file_is_io_error() {
        let source = CsvPriceSource::new("/definitely/not/here.csv");
        let err = source.fetch_prices().await.unwrap_err();
        assert!(matches!(err, DataSourceError::Io(_)));
    }
}
