//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) bars are invalid.

use crate::domain::candle::PriceTable;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorSpec, IndicatorValue};

pub fn calculate_ema(table: &PriceTable, period: usize) -> IndicatorSeries {
    IndicatorSeries {
        spec: IndicatorSpec::Ema(period),
        values: ema_points(&table.time, &table.close, period),
    }
}

/// EMA over an arbitrary column; shared with MACD.
pub(crate) fn ema_points(time: &[i64], input: &[f64], period: usize) -> Vec<IndicatorPoint> {
    if period == 0 || input.is_empty() {
        return Vec::new();
    }

    let mut values = Vec::with_capacity(input.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, &x) in input.iter().enumerate() {
        let valid = if i + 1 < period {
            sum += x;
            false
        } else if i + 1 == period {
            sum += x;
            ema = sum / period as f64;
            true
        } else {
            ema = x * k + ema * (1.0 - k);
            true
        };
        values.push(IndicatorPoint {
            timestamp: time[i],
            valid,
            value: IndicatorValue::Simple(if valid { ema } else { 0.0 }),
        });
    }

    values
}
