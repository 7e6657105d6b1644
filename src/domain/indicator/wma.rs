//! Weighted Moving Average.
//!
//! O(n) sliding window:
//! WMA(n) = (1*P[i-n+1] + 2*P[i-n+2] + ... + n*P[i]) / (n*(n+1)/2)
//! Warmup: first (n-1) bars are invalid.

use crate::domain::candle::PriceTable;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorSpec, IndicatorValue};

pub fn calculate_wma(table: &PriceTable, period: usize) -> IndicatorSeries {
    if period == 0 || table.is_empty() {
        return IndicatorSeries::empty(IndicatorSpec::Wma(period));
    }

    let closes = &table.close;
    let mut values = Vec::with_capacity(closes.len());
    let divisor = period as f64 * (period as f64 + 1.0) / 2.0;
    let mut weighted_sum = 0.0;
    let mut window_sum = 0.0;

    for (i, &close) in closes.iter().enumerate() {
        if i < period {
            weighted_sum += (i + 1) as f64 * close;
            window_sum += close;
        } else {
            weighted_sum += period as f64 * close - window_sum;
            window_sum += close - closes[i - period];
        }

        let valid = i + 1 >= period;
        values.push(IndicatorPoint {
            timestamp: table.time[i],
            valid,
            value: IndicatorValue::Simple(if valid { weighted_sum / divisor } else { 0.0 }),
        });
    }

    IndicatorSeries {
        spec: IndicatorSpec::Wma(period),
        values,
    }
}
