//! Technical indicator math over a [`PriceTable`].
//!
//! - `IndicatorPoint`: one point, stamped with the bar's epoch-second time
//! - `IndicatorValue`: single-line, MACD or band-shaped output
//! - `IndicatorSpec`: indicator identity plus parameters
//! - `IndicatorSeries`: one point per input bar, warmup bars marked invalid

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod wma;

pub use atr::calculate_atr;
pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use obv::calculate_obv;
pub use roc::calculate_roc;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stddev::calculate_stddev;
pub use wma::calculate_wma;

#[cfg(test)]
use crate::domain::candle::PriceTable;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: i64,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

impl IndicatorValue {
    /// The value of a single-line indicator, `None` for multi-line shapes.
    pub fn simple(&self) -> Option<f64> {
        match self {
            IndicatorValue::Simple(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorSpec {
    Sma(usize),
    Ema(usize),
    Wma(usize),
    Rsi(usize),
    Roc(usize),
    Atr(usize),
    Stddev(usize),
    Obv,
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        multiplier: f64,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub spec: IndicatorSpec,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn empty(spec: IndicatorSpec) -> Self {
        Self {
            spec,
            values: Vec::new(),
        }
    }

    pub fn valid_points(&self) -> impl Iterator<Item = &IndicatorPoint> {
        self.values.iter().filter(|p| p.valid)
    }
}

/// Flat bars at one-minute spacing; open/high/low all equal the close.
#[cfg(test)]
pub(crate) fn table_from_closes(closes: &[f64]) -> PriceTable {
    let n = closes.len();
    PriceTable {
        time: (0..n as i64).map(|i| 1_700_000_000 + i * 60).collect(),
        open: closes.to_vec(),
        high: closes.to_vec(),
        low: closes.to_vec(),
        close: closes.to_vec(),
        volume: vec![1000.0; n],
    }
}
