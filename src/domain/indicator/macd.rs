//! Moving Average Convergence Divergence.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of the MACD line, seeded once the slow EMA is valid
//! Histogram = MACD Line - Signal Line
//!
//! Warmup: slow - 1 + signal - 1 bars.

use crate::domain::candle::PriceTable;
use crate::domain::indicator::ema::ema_points;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorSpec, IndicatorValue};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    table: &PriceTable,
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let spec = IndicatorSpec::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    if table.is_empty() || fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries::empty(spec);
    }

    let ema_fast = raw(&ema_points(&table.time, &table.close, fast));
    let ema_slow = raw(&ema_points(&table.time, &table.close, slow));
    let macd_line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();

    let macd_warmup = slow.max(fast) - 1;
    let mut signal_line = vec![0.0; table.len()];
    if macd_warmup < table.len() {
        let seeded = ema_points(&table.time[macd_warmup..], &macd_line[macd_warmup..], signal_period);
        for (i, p) in seeded.iter().enumerate() {
            signal_line[macd_warmup + i] = p.value.simple().unwrap_or(0.0);
        }
    }

    let signal_warmup = macd_warmup.saturating_add(signal_period - 1);
    let values = (0..table.len())
        .map(|i| IndicatorPoint {
            timestamp: table.time[i],
            valid: i >= signal_warmup,
            value: IndicatorValue::Macd {
                line: macd_line[i],
                signal: signal_line[i],
                histogram: macd_line[i] - signal_line[i],
            },
        })
        .collect();

    IndicatorSeries { spec, values }
}

fn raw(points: &[IndicatorPoint]) -> Vec<f64> {
    points
        .iter()
        .map(|p| p.value.simple().unwrap_or(0.0))
        .collect()
}
