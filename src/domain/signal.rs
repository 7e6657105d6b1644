//! Strategy signal events.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::candle::Candle;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySignal {
    pub strategy_name: String,
    pub product_id: String,
    pub is_buy: bool,
    pub is_sell: bool,
    /// Close of the evaluated candle.
    pub price: f64,
    /// Wall clock at evaluation, not the candle's time.
    pub timestamp: DateTime<Utc>,
}

impl StrategySignal {
    pub fn new(strategy_name: &str, candle: &Candle, is_buy: bool, is_sell: bool) -> Self {
        Self {
            strategy_name: strategy_name.to_string(),
            product_id: candle.product_id.clone(),
            is_buy,
            is_sell,
            price: candle.close,
            timestamp: Utc::now(),
        }
    }
}
