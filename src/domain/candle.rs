//! Candle representation and the columnar table fed to calculators.

use serde::{Deserialize, Serialize};

/// One OHLCV bar. `open_time` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub product_id: String,
}

impl Candle {
    pub fn field(&self, field: CandleField) -> f64 {
        match field {
            CandleField::Open => self.open,
            CandleField::High => self.high,
            CandleField::Low => self.low,
            CandleField::Close => self.close,
            CandleField::Volume => self.volume,
        }
    }
}

/// Candle fields addressable by name from a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandleField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl CandleField {
    /// Case-insensitive lookup; `None` for anything that is not a price field.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "open" => Some(CandleField::Open),
            "high" => Some(CandleField::High),
            "low" => Some(CandleField::Low),
            "close" => Some(CandleField::Close),
            "volume" => Some(CandleField::Volume),
            _ => None,
        }
    }
}

/// Column-oriented candle history, oldest first. `time` is epoch seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    pub time: Vec<i64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl PriceTable {
    pub fn from_candles(candles: &[Candle]) -> Self {
        let mut table = PriceTable {
            time: Vec::with_capacity(candles.len()),
            open: Vec::with_capacity(candles.len()),
            high: Vec::with_capacity(candles.len()),
            low: Vec::with_capacity(candles.len()),
            close: Vec::with_capacity(candles.len()),
            volume: Vec::with_capacity(candles.len()),
        };
        for c in candles {
            table.time.push(c.open_time.div_euclid(1000));
            table.open.push(c.open);
            table.high.push(c.high);
            table.low.push(c.low);
            table.close.push(c.close);
            table.volume.push(c.volume);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}
