//! Range, precision and balance checks shared by construction and execution.

use crate::domain::{Asset, Decimal, MAX_PRECISION};
use crate::error::{BalanceError, InvalidValue};

/// Validated price bounds of a ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub lower: Decimal,
    pub upper: Decimal,
    pub initial: Decimal,
}

pub fn validate_eps(eps: Decimal) -> Result<Decimal, InvalidValue> {
    if eps <= Decimal::zero() {
        return Err(InvalidValue::new("eps", "must be greater than zero"));
    }
    Ok(eps)
}

pub fn validate_positive(value: Decimal, name: &str, eps: Decimal) -> Result<Decimal, InvalidValue> {
    if value <= eps {
        return Err(InvalidValue::new(
            name,
            format!("must be greater than {} (value={})", eps, value),
        ));
    }
    Ok(value)
}

pub fn validate_non_negative(
    value: Decimal,
    name: &str,
    eps: Decimal,
) -> Result<Decimal, InvalidValue> {
    if value < -eps {
        return Err(InvalidValue::new(
            name,
            format!("cannot be negative (value={})", value),
        ));
    }
    Ok(value)
}

pub fn validate_bounds(
    lower_price: Decimal,
    upper_price: Decimal,
    num_levels: usize,
    initial_price: Decimal,
    eps: Decimal,
) -> Result<Bounds, InvalidValue> {
    let lower = validate_positive(lower_price, "lower_price", eps)?;
    let upper = validate_positive(upper_price, "upper_price", eps)?;
    if num_levels < 2 {
        return Err(InvalidValue::new(
            "num_levels",
            format!(
                "must be at least 2 to build a geometric grid (value={})",
                num_levels
            ),
        ));
    }
    if lower >= upper {
        return Err(InvalidValue::new(
            "lower_price",
            format!(
                "must be strictly less than upper_price (lower={}, upper={})",
                lower, upper
            ),
        ));
    }
    let initial = validate_positive(initial_price, "initial_price", eps)?;
    if initial < lower - eps || initial > upper + eps {
        return Err(InvalidValue::new(
            "initial_price",
            format!(
                "must lie within the [{}, {}] range (value={})",
                lower, upper, initial
            ),
        ));
    }
    Ok(Bounds {
        lower,
        upper,
        initial,
    })
}

/// Fee and slippage rates live in `[0, 1)`.
pub fn validate_rate(value: Decimal, name: &str) -> Result<Decimal, InvalidValue> {
    if value < Decimal::zero() {
        return Err(InvalidValue::new(
            name,
            format!("cannot be negative (value={})", value),
        ));
    }
    if value >= Decimal::one() {
        return Err(InvalidValue::new(
            name,
            format!("must be lower than 1 (value={})", value),
        ));
    }
    Ok(value)
}

pub fn validate_precision(precision: i32, name: &str) -> Result<u32, InvalidValue> {
    if precision < 0 {
        return Err(InvalidValue::new(
            name,
            format!("must be non-negative (value={})", precision),
        ));
    }
    let precision = precision as u32;
    if precision > MAX_PRECISION {
        return Err(InvalidValue::new(
            name,
            format!("must be at most {} (value={})", MAX_PRECISION, precision),
        ));
    }
    Ok(precision)
}

pub fn validate_asset(asset: &Asset, name: &str) -> Result<(), InvalidValue> {
    if asset.is_empty() {
        return Err(InvalidValue::new(name, "must not be empty"));
    }
    Ok(())
}

pub fn ensure_sufficient_balance(
    balance: Decimal,
    required: Decimal,
    asset: &Asset,
    eps: Decimal,
) -> Result<(), BalanceError> {
    if balance + eps < required {
        return Err(BalanceError::Insufficient {
            asset: asset.clone(),
            required,
            available: balance,
        });
    }
    Ok(())
}

pub fn ensure_non_negative_balance(
    balance: Decimal,
    asset: &Asset,
    eps: Decimal,
) -> Result<(), BalanceError> {
    if balance < -eps {
        return Err(BalanceError::Negative {
            asset: asset.clone(),
            balance,
        });
    }
    Ok(())
}

/// Rejects conversions whose result rounded to (near) zero.
pub fn ensure_trade_result(
    quantity: Decimal,
    asset: &Asset,
    eps: Decimal,
) -> Result<(), BalanceError> {
    if quantity <= eps {
        return Err(BalanceError::DegenerateTrade {
            asset: asset.clone(),
            quantity,
        });
    }
    Ok(())
}
