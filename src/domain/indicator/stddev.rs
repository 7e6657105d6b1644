//! Rolling standard deviation.
//!
//! Population standard deviation over n closing prices.
//! Warmup: first (n-1) bars are invalid.

use crate::domain::candle::PriceTable;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorSpec, IndicatorValue};

pub fn calculate_stddev(table: &PriceTable, period: usize) -> IndicatorSeries {
    let spec = IndicatorSpec::Stddev(period);
    if period == 0 || table.is_empty() {
        return IndicatorSeries::empty(spec);
    }

    let values = (0..table.len())
        .map(|i| {
            let valid = i + 1 >= period;
            let value = if valid {
                window_mean_stddev(&table.close[i + 1 - period..=i]).1
            } else {
                0.0
            };
            IndicatorPoint {
                timestamp: table.time[i],
                valid,
                value: IndicatorValue::Simple(value),
            }
        })
        .collect();

    IndicatorSeries { spec, values }
}

/// (mean, population stddev) of a non-empty window.
pub(crate) fn window_mean_stddev(window: &[f64]) -> (f64, f64) {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
