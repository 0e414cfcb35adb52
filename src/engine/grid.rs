use tracing::{debug, info};

use crate::domain::{Asset, Decimal, Level, Side, TimeMs, TradeRecord};
use crate::error::{BalanceError, GridError};

use super::arithmetic;
use super::ladder::build_ladder;
use super::snapshot::EngineSnapshot;
use super::validation::{
    ensure_non_negative_balance, ensure_sufficient_balance, ensure_trade_result, validate_asset,
    validate_bounds, validate_eps, validate_non_negative, validate_positive, validate_precision,
    validate_rate,
};

/// Construction input for a [`GridEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub base_asset: Asset,
    pub quote_asset: Asset,
    pub num_levels: usize,
    pub lower_price: Decimal,
    pub upper_price: Decimal,
    pub initial_price: Decimal,
    pub base_balance: Decimal,
    pub quote_balance: Decimal,
    pub fee_rate: Decimal,
    pub slippage_rate: Decimal,
    pub price_precision: i32,
    pub quantity_precision: i32,
    /// Tolerance band for every price and balance comparison.
    pub eps: Decimal,
}

impl GridConfig {
    pub const DEFAULT_PRICE_PRECISION: i32 = 2;
    pub const DEFAULT_QUANTITY_PRECISION: i32 = 8;

    /// Create a config with zero fees, zero slippage and default precisions.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base_asset: Asset,
        quote_asset: Asset,
        num_levels: usize,
        lower_price: Decimal,
        upper_price: Decimal,
        initial_price: Decimal,
        base_balance: Decimal,
        quote_balance: Decimal,
    ) -> Self {
        Self {
            base_asset,
            quote_asset,
            num_levels,
            lower_price,
            upper_price,
            initial_price,
            base_balance,
            quote_balance,
            fee_rate: Decimal::zero(),
            slippage_rate: Decimal::zero(),
            price_precision: Self::DEFAULT_PRICE_PRECISION,
            quantity_precision: Self::DEFAULT_QUANTITY_PRECISION,
            eps: Self::default_eps(),
        }
    }

    /// `1e-9`.
    pub fn default_eps() -> Decimal {
        Decimal::new(rust_decimal::Decimal::new(1, 9))
    }

    pub fn with_fee_rate(mut self, fee_rate: Decimal) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    pub fn with_slippage_rate(mut self, slippage_rate: Decimal) -> Self {
        self.slippage_rate = slippage_rate;
        self
    }

    pub fn with_precision(mut self, price_precision: i32, quantity_precision: i32) -> Self {
        self.price_precision = price_precision;
        self.quantity_precision = quantity_precision;
        self
    }

    pub fn with_eps(mut self, eps: Decimal) -> Self {
        self.eps = eps;
        self
    }
}

/// Geometric grid simulator for a single base/quote pair.
///
/// Owns its ladder and balances outright; callers serialize access (one
/// engine per task or behind one lock).
#[derive(Debug, Clone)]
pub struct GridEngine {
    base_asset: Asset,
    quote_asset: Asset,
    fee_rate: Decimal,
    slippage_rate: Decimal,
    price_precision: u32,
    quantity_precision: u32,
    eps: Decimal,
    ratio: Decimal,

    base_balance: Decimal,
    quote_balance: Decimal,
    levels: Vec<Level>,
    trade_history: Vec<TradeRecord>,
}

impl GridEngine {
    /// Validate `config`, build the ladder and seed every level.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        let eps = validate_eps(config.eps).map_err(GridError::Configuration)?;
        validate_asset(&config.base_asset, "base_asset").map_err(GridError::Configuration)?;
        validate_asset(&config.quote_asset, "quote_asset").map_err(GridError::Configuration)?;
        let bounds = validate_bounds(
            config.lower_price,
            config.upper_price,
            config.num_levels,
            config.initial_price,
            eps,
        )
        .map_err(GridError::Configuration)?;
        let base_balance = validate_non_negative(config.base_balance, "base_balance", eps)
            .map_err(GridError::Configuration)?;
        let quote_balance = validate_non_negative(config.quote_balance, "quote_balance", eps)
            .map_err(GridError::Configuration)?;
        let fee_rate = validate_rate(config.fee_rate, "fee_rate").map_err(GridError::Configuration)?;
        let slippage_rate =
            validate_rate(config.slippage_rate, "slippage_rate").map_err(GridError::Configuration)?;
        let price_precision = validate_precision(config.price_precision, "price_precision")
            .map_err(GridError::Configuration)?;
        let quantity_precision = validate_precision(config.quantity_precision, "quantity_precision")
            .map_err(GridError::Configuration)?;

        let ladder = build_ladder(
            &bounds,
            config.num_levels,
            base_balance,
            quote_balance,
            price_precision,
            quantity_precision,
            eps,
        )
        .map_err(GridError::Configuration)?;

        let engine = Self {
            base_asset: config.base_asset,
            quote_asset: config.quote_asset,
            fee_rate,
            slippage_rate,
            price_precision,
            quantity_precision,
            eps,
            ratio: ladder.ratio,
            base_balance,
            quote_balance,
            levels: ladder.levels,
            trade_history: Vec::new(),
        };

        info!(
            "grid {}/{} built: {} levels from {} to {} (ratio {}), {} holding base, {} holding quote",
            engine.base_asset,
            engine.quote_asset,
            engine.levels.len(),
            bounds.lower,
            bounds.upper,
            engine.ratio,
            engine.pending_sells().len(),
            engine.pending_buys().len(),
        );

        Ok(engine)
    }

    /// Process a market price stamped with the current wall-clock time.
    pub fn on_price_tick(&mut self, price: Decimal) -> Result<Vec<TradeRecord>, GridError> {
        self.on_price_tick_at(price, TimeMs::now())
    }

    /// Process a market price, executing every eligible level.
    ///
    /// Buys run over quote-holding levels in ascending price order where
    /// `price <= level + eps`; sells then run over base-holding levels in
    /// descending order where `price >= level - eps`. Each level commits on
    /// its own: a balance error aborts the rest of the tick but keeps the
    /// conversions already made. Returns the trades executed by this tick.
    ///
    /// # Panics
    /// Panics if a balance ends the tick below `-eps`. Execution checks make
    /// this unreachable; reaching it means the engine itself is broken.
    pub fn on_price_tick_at(
        &mut self,
        price: Decimal,
        time_ms: TimeMs,
    ) -> Result<Vec<TradeRecord>, GridError> {
        let current_price =
            validate_positive(price, "market_price", self.eps).map_err(GridError::Validation)?;
        let first_new = self.trade_history.len();

        for index in 0..self.levels.len() {
            let level = &self.levels[index];
            if level.is_holding_quote() && current_price <= level.price + self.eps {
                self.execute_buy_at_level(index, time_ms)?;
            }
        }

        for index in (0..self.levels.len()).rev() {
            let level = &self.levels[index];
            if level.is_holding_base() && current_price >= level.price - self.eps {
                self.execute_sell_at_level(index, time_ms)?;
            }
        }

        self.assert_balances_non_negative();

        Ok(self.trade_history[first_new..].to_vec())
    }

    /// Read-only projection of balances, levels and trade history.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::capture(self)
    }

    fn execute_buy_at_level(&mut self, index: usize, time_ms: TimeMs) -> Result<(), GridError> {
        let level_price = self.levels[index].price;
        let quote_amount = self.levels[index].quote_budget();
        if quote_amount <= self.eps {
            return Ok(());
        }

        ensure_sufficient_balance(self.quote_balance, quote_amount, &self.quote_asset, self.eps)?;
        let trade = arithmetic::execute_buy(
            quote_amount,
            level_price,
            self.fee_rate,
            self.slippage_rate,
            self.quantity_precision,
            self.price_precision,
        )
        .ok_or_else(|| overflow(&self.base_asset))?;
        ensure_trade_result(trade.quantity, &self.base_asset, self.eps)?;
        let base_balance = self
            .base_balance
            .checked_add(trade.quantity)
            .ok_or_else(|| overflow(&self.base_asset))?;

        self.quote_balance -= trade.quote_amount;
        self.base_balance = base_balance;
        self.levels[index].mark_bought(trade.quantity);

        let note = format!(
            "Bought {} {} using {} {}",
            trade.quantity, self.base_asset, trade.quote_amount, self.quote_asset
        );
        self.record_trade(Side::Buy, level_price, trade, note, time_ms);
        Ok(())
    }

    fn execute_sell_at_level(&mut self, index: usize, time_ms: TimeMs) -> Result<(), GridError> {
        let level_price = self.levels[index].price;
        let base_amount = self.levels[index].base_position();
        if base_amount <= self.eps {
            return Ok(());
        }

        ensure_sufficient_balance(self.base_balance, base_amount, &self.base_asset, self.eps)?;
        let trade = arithmetic::execute_sell(
            base_amount,
            level_price,
            self.fee_rate,
            self.slippage_rate,
            self.quantity_precision,
            self.price_precision,
        )
        .ok_or_else(|| overflow(&self.quote_asset))?;
        ensure_trade_result(trade.quote_amount, &self.quote_asset, self.eps)?;
        let quote_balance = self
            .quote_balance
            .checked_add(trade.quote_amount)
            .ok_or_else(|| overflow(&self.quote_asset))?;

        self.base_balance -= trade.quantity;
        self.quote_balance = quote_balance;
        self.levels[index].mark_sold(trade.quote_amount);

        let note = format!(
            "Sold {} {} for {} {}",
            trade.quantity, self.base_asset, trade.quote_amount, self.quote_asset
        );
        self.record_trade(Side::Sell, level_price, trade, note, time_ms);
        Ok(())
    }

    fn record_trade(
        &mut self,
        side: Side,
        level_price: Decimal,
        trade: arithmetic::TradeBreakdown,
        note: String,
        time_ms: TimeMs,
    ) {
        debug!(
            "{} {} at level {}: {} (execution price {}, fee {})",
            time_ms.to_rfc3339(),
            side,
            level_price,
            note,
            trade.effective_price,
            trade.fee_paid
        );

        self.trade_history.push(TradeRecord {
            time_ms,
            side,
            level_price,
            execution_price: trade.effective_price,
            quantity: trade.quantity,
            quote_amount: trade.quote_amount,
            fee_paid: trade.fee_paid,
            note,
        });
    }

    fn assert_balances_non_negative(&self) {
        let checked = ensure_non_negative_balance(self.base_balance, &self.base_asset, self.eps)
            .and_then(|_| {
                ensure_non_negative_balance(self.quote_balance, &self.quote_asset, self.eps)
            });
        if let Err(err) = checked {
            panic!("grid invariant violated after tick: {}", err);
        }
    }

    pub fn base_asset(&self) -> &Asset {
        &self.base_asset
    }

    pub fn quote_asset(&self) -> &Asset {
        &self.quote_asset
    }

    pub fn base_balance(&self) -> Decimal {
        self.base_balance
    }

    pub fn quote_balance(&self) -> Decimal {
        self.quote_balance
    }

    /// Ratio between consecutive level prices.
    pub fn ratio(&self) -> Decimal {
        self.ratio
    }

    pub fn eps(&self) -> Decimal {
        self.eps
    }

    /// Levels in ascending price order.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn trade_history(&self) -> &[TradeRecord] {
        &self.trade_history
    }

    /// Indices of levels waiting to buy.
    pub fn pending_buys(&self) -> Vec<usize> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, level)| level.is_holding_quote())
            .map(|(index, _)| index)
            .collect()
    }

    /// Indices of levels waiting to sell.
    pub fn pending_sells(&self) -> Vec<usize> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, level)| level.is_holding_base())
            .map(|(index, _)| index)
            .collect()
    }

    /// Portfolio value in quote units at `mark_price`, `None` if it overflows.
    pub fn equity_at(&self, mark_price: Decimal) -> Option<Decimal> {
        self.base_balance
            .checked_mul(mark_price)?
            .checked_add(self.quote_balance)
    }

    /// Base committed to levels.
    pub fn allocated_base(&self) -> Decimal {
        self.levels.iter().map(Level::base_position).sum()
    }

    /// Quote committed to levels.
    pub fn allocated_quote(&self) -> Decimal {
        self.levels.iter().map(Level::quote_budget).sum()
    }

    /// Base left in the free balance by allocation rounding.
    pub fn base_dust(&self) -> Decimal {
        self.base_balance - self.allocated_base()
    }

    /// Quote left in the free balance by allocation rounding.
    pub fn quote_dust(&self) -> Decimal {
        self.quote_balance - self.allocated_quote()
    }

    pub fn price_precision(&self) -> u32 {
        self.price_precision
    }

    pub fn quantity_precision(&self) -> u32 {
        self.quantity_precision
    }
}

fn overflow(asset: &Asset) -> GridError {
    GridError::Balance(BalanceError::Overflow {
        asset: asset.clone(),
    })
}
