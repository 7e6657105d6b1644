//! Bollinger Bands.
//!
//! - Middle: SMA over n closes
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the population standard deviation (divides by N).
//! Warmup: first (period-1) bars are invalid.

use crate::domain::candle::PriceTable;
use crate::domain::indicator::stddev::window_mean_stddev;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorSpec, IndicatorValue};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

pub fn calculate_bollinger(table: &PriceTable, period: usize, multiplier: f64) -> IndicatorSeries {
    let spec = IndicatorSpec::Bollinger { period, multiplier };
    if period == 0 || table.is_empty() {
        return IndicatorSeries::empty(spec);
    }

    let values = (0..table.len())
        .map(|i| {
            let valid = i + 1 >= period;
            let (upper, middle, lower) = if valid {
                let (mean, stddev) = window_mean_stddev(&table.close[i + 1 - period..=i]);
                (mean + multiplier * stddev, mean, mean - multiplier * stddev)
            } else {
                (0.0, 0.0, 0.0)
            };
            IndicatorPoint {
                timestamp: table.time[i],
                valid,
                value: IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                },
            }
        })
        .collect();

    IndicatorSeries { spec, values }
}
