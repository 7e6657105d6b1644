//! Candle data port.

use crate::domain::candle::Candle;
use crate::domain::error::EngineError;

pub trait CandleSource {
    /// Candles oldest first, optionally restricted to one product.
    fn fetch_candles(&self, product_id: Option<&str>) -> Result<Vec<Candle>, EngineError>;
}
