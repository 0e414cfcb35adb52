use crate::domain::{Asset, Decimal};
use crate::engine::GridConfig;
use crate::orchestration::TickErrorPolicy;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Runtime configuration for the replay binary.
#[derive(Debug, Clone)]
pub struct Config {
    pub grid: GridConfig,
    pub prices_path: PathBuf,
    pub snapshot_path: Option<PathBuf>,
    pub tick_error_policy: TickErrorPolicy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    /// Parse configuration from a key/value map.
    ///
    /// Only syntax is checked here; ranges and bounds are checked when the
    /// engine is built.
    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let base_asset = Asset::new(required(&env_map, "GRID_BASE_ASSET")?);
        let quote_asset = Asset::new(required(&env_map, "GRID_QUOTE_ASSET")?);

        let num_levels = required(&env_map, "GRID_NUM_LEVELS")?
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "GRID_NUM_LEVELS".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?;

        let lower_price = parse_decimal("GRID_LOWER_PRICE", &required(&env_map, "GRID_LOWER_PRICE")?)?;
        let upper_price = parse_decimal("GRID_UPPER_PRICE", &required(&env_map, "GRID_UPPER_PRICE")?)?;
        let initial_price =
            parse_decimal("GRID_INITIAL_PRICE", &required(&env_map, "GRID_INITIAL_PRICE")?)?;

        let base_balance = optional_decimal(&env_map, "GRID_BASE_BALANCE", "0")?;
        let quote_balance = optional_decimal(&env_map, "GRID_QUOTE_BALANCE", "0")?;
        let fee_rate = optional_decimal(&env_map, "GRID_FEE_RATE", "0")?;
        let slippage_rate = optional_decimal(&env_map, "GRID_SLIPPAGE_RATE", "0")?;
        let eps = optional_decimal(&env_map, "GRID_EPS", "0.000000001")?;

        let price_precision = optional_i32(
            &env_map,
            "GRID_PRICE_PRECISION",
            GridConfig::DEFAULT_PRICE_PRECISION,
        )?;
        let quantity_precision = optional_i32(
            &env_map,
            "GRID_QUANTITY_PRECISION",
            GridConfig::DEFAULT_QUANTITY_PRECISION,
        )?;

        let prices_path = PathBuf::from(required(&env_map, "PRICES_PATH")?);
        let snapshot_path = env_map
            .get("SNAPSHOT_PATH")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let tick_error_policy = env_map
            .get("TICK_ERROR_POLICY")
            .map(|s| s.as_str())
            .unwrap_or("abort")
            .parse::<TickErrorPolicy>()
            .map_err(|reason| ConfigError::InvalidValue("TICK_ERROR_POLICY".to_string(), reason))?;

        let grid = GridConfig::new(
            base_asset,
            quote_asset,
            num_levels,
            lower_price,
            upper_price,
            initial_price,
            base_balance,
            quote_balance,
        )
        .with_fee_rate(fee_rate)
        .with_slippage_rate(slippage_rate)
        .with_precision(price_precision, quantity_precision)
        .with_eps(eps);

        Ok(Config {
            grid,
            prices_path,
            snapshot_path,
            tick_error_policy,
        })
    }
}

fn required(env_map: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    env_map
        .get(key)
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

fn parse_decimal(key: &str, raw: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str_canonical(raw).map_err(|e| {
        ConfigError::InvalidValue(key.to_string(), format!("must be a decimal ({})", e))
    })
}

fn optional_decimal(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<Decimal, ConfigError> {
    parse_decimal(key, env_map.get(key).map(|s| s.as_str()).unwrap_or(default))
}

fn optional_i32(
    env_map: &HashMap<String, String>,
    key: &str,
    default: i32,
) -> Result<i32, ConfigError> {
    match env_map.get(key) {
        Some(raw) => raw.trim().parse::<i32>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a valid i32".to_string())
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("GRID_BASE_ASSET".to_string(), "BTC".to_string());
        map.insert("GRID_QUOTE_ASSET".to_string(), "USDT".to_string());
        map.insert("GRID_NUM_LEVELS".to_string(), "5".to_string());
        map.insert("GRID_LOWER_PRICE".to_string(), "25000".to_string());
        map.insert("GRID_UPPER_PRICE".to_string(), "35000".to_string());
        map.insert("GRID_INITIAL_PRICE".to_string(), "30000".to_string());
        map.insert("PRICES_PATH".to_string(), "/tmp/prices.csv".to_string());
        map
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.grid.base_asset, Asset::new("BTC"));
        assert_eq!(config.grid.num_levels, 5);
        assert_eq!(config.grid.base_balance, Decimal::zero());
        assert_eq!(config.grid.fee_rate, Decimal::zero());
        assert_eq!(config.grid.price_precision, 2);
        assert_eq!(config.grid.quantity_precision, 8);
        assert_eq!(config.grid.eps, d("0.000000001"));
        assert_eq!(config.prices_path, PathBuf::from("/tmp/prices.csv"));
        assert_eq!(config.snapshot_path, None);
        assert_eq!(config.tick_error_policy, TickErrorPolicy::Abort);
    }

    #[test]
    fn test_optional_values_parsed_exactly() {
        let mut env_map = setup_required_env();
        env_map.insert("GRID_QUOTE_BALANCE".to_string(), "10000.10".to_string());
        env_map.insert("GRID_FEE_RATE".to_string(), "0.001".to_string());
        env_map.insert("GRID_EPS".to_string(), "1e-12".to_string());
        env_map.insert("GRID_QUANTITY_PRECISION".to_string(), "6".to_string());
        env_map.insert("SNAPSHOT_PATH".to_string(), "/tmp/snap.json".to_string());
        env_map.insert("TICK_ERROR_POLICY".to_string(), "skip".to_string());

        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.grid.quote_balance, d("10000.1"));
        assert_eq!(config.grid.fee_rate, d("0.001"));
        assert_eq!(config.grid.eps, d("0.000000000001"));
        assert_eq!(config.grid.quantity_precision, 6);
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/snap.json")));
        assert_eq!(config.tick_error_policy, TickErrorPolicy::Skip);
    }

    #[test]
    fn test_missing_required_keys() {
        for key in [
            "GRID_BASE_ASSET",
            "GRID_QUOTE_ASSET",
            "GRID_NUM_LEVELS",
            "GRID_LOWER_PRICE",
            "GRID_UPPER_PRICE",
            "GRID_INITIAL_PRICE",
            "PRICES_PATH",
        ] {
            let mut env_map = setup_required_env();
            env_map.remove(key);
            match Config::from_env_map(env_map) {
                Err(ConfigError::MissingEnv(s)) => assert_eq!(s, key),
                other => panic!("Expected MissingEnv for {}, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn test_invalid_num_levels() {
        let mut env_map = setup_required_env();
        env_map.insert("GRID_NUM_LEVELS".to_string(), "three".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "GRID_NUM_LEVELS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_decimal() {
        let mut env_map = setup_required_env();
        env_map.insert("GRID_LOWER_PRICE".to_string(), "cheap".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "GRID_LOWER_PRICE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_negative_precision_passes_through_to_engine_validation() {
        let mut env_map = setup_required_env();
        env_map.insert("GRID_PRICE_PRECISION".to_string(), "-1".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.grid.price_precision, -1);
    }

    #[test]
    fn test_invalid_tick_error_policy() {
        let mut env_map = setup_required_env();
        env_map.insert("TICK_ERROR_POLICY".to_string(), "retry".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "TICK_ERROR_POLICY"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
