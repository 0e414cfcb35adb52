use crate::domain::{Asset, Decimal};
use thiserror::Error;

/// A value that failed a range or format check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct InvalidValue {
    pub field: String,
    pub reason: String,
}

impl InvalidValue {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("Insufficient balance for {asset}: required {required}, available {available}")]
    Insufficient {
        asset: Asset,
        required: Decimal,
        available: Decimal,
    },
    #[error("Trade on {asset} would result in a null or negative quantity ({quantity})")]
    DegenerateTrade { asset: Asset, quantity: Decimal },
    #[error("Balance for {asset} became negative: {balance}")]
    Negative { asset: Asset, balance: Decimal },
    #[error("Amount of {asset} exceeds the representable decimal range")]
    Overflow { asset: Asset },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Invalid construction parameters; the engine is never created.
    #[error("Configuration error: {0}")]
    Configuration(InvalidValue),
    /// Invalid runtime input; the tick is rejected with state unchanged.
    #[error("Validation error: {0}")]
    Validation(InvalidValue),
    /// A triggered conversion could not be honored; the rest of the tick is
    /// abandoned, earlier conversions in the same tick stay committed.
    #[error("Balance error: {0}")]
    Balance(#[from] BalanceError),
}

impl GridError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, GridError::Configuration(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, GridError::Validation(_))
    }

    pub fn is_balance(&self) -> bool {
        matches!(self, GridError::Balance(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = GridError::Configuration(InvalidValue::new(
            "lower_price",
            "must be strictly less than upper_price",
        ));
        assert_eq!(
            err.to_string(),
            "Configuration error: lower_price must be strictly less than upper_price"
        );

        let err = GridError::from(BalanceError::Insufficient {
            asset: Asset::new("USDT"),
            required: Decimal::from_i64(500),
            available: Decimal::from_i64(20),
        });
        assert!(err.is_balance());
        assert_eq!(
            err.to_string(),
            "Balance error: Insufficient balance for USDT: required 500, available 20"
        );
    }
}
