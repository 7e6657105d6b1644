//! Relative Strength Index with Wilder's smoothing.
//!
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)), and 100 when avg_loss == 0.
//! Warmup: first n bars are invalid.

use crate::domain::candle::PriceTable;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorSpec, IndicatorValue};

pub fn calculate_rsi(table: &PriceTable, period: usize) -> IndicatorSeries {
    let spec = IndicatorSpec::Rsi(period);
    if period == 0 || table.is_empty() {
        return IndicatorSeries::empty(spec);
    }

    let closes = &table.close;
    let mut values = Vec::with_capacity(closes.len());
    values.push(IndicatorPoint {
        timestamp: table.time[0],
        valid: false,
        value: IndicatorValue::Simple(0.0),
    });

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        // i changes seen so far
        let valid = if i < period {
            avg_gain += gain;
            avg_loss += loss;
            false
        } else if i == period {
            avg_gain = (avg_gain + gain) / period as f64;
            avg_loss = (avg_loss + loss) / period as f64;
            true
        } else {
            avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
            true
        };

        let rsi = if !valid {
            0.0
        } else if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        };

        values.push(IndicatorPoint {
            timestamp: table.time[i],
            valid,
            value: IndicatorValue::Simple(rsi),
        });
    }

    IndicatorSeries { spec, values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::table_from_closes;
    use approx::assert_relative_eq;

    fn simple(series: &IndicatorSeries, i: usize) -> f64 {
        series.values[i].value.simple().unwrap()
    }

    #[test]
    fn rsi_warmup() {
        let series = calculate_rsi(&table_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3);
        assert!(!series.values[0].valid);
        assert!(!series.values[2].valid);
        assert!(series.values[3].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let series = calculate_rsi(&table_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3);
        assert_relative_eq!(simple(&series, 3), 100.0);
        assert_relative_eq!(simple(&series, 4), 100.0);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let series = calculate_rsi(&table_from_closes(&[5.0, 4.0, 3.0, 2.0]), 2);
        assert_relative_eq!(simple(&series, 2), 0.0);
        assert_relative_eq!(simple(&series, 3), 0.0);
    }

    #[test]
    fn rsi_first_average_and_wilder_step() {
        // changes: +2, -1, +3, -2
        let series = calculate_rsi(&table_from_closes(&[10.0, 12.0, 11.0, 14.0, 12.0]), 3);
        let g = 5.0 / 3.0;
        let l = 1.0 / 3.0;
        assert_relative_eq!(simple(&series, 3), 100.0 - 100.0 / (1.0 + g / l), epsilon = 1e-9);

        let g2 = g * 2.0 / 3.0;
        let l2 = (l * 2.0 + 2.0) / 3.0;
        assert_relative_eq!(simple(&series, 4), 100.0 - 100.0 / (1.0 + g2 / l2), epsilon = 1e-9);
    }

    #[test]
    fn rsi_stays_in_range() {
        let closes = [44.0, 44.3, 44.1, 43.6, 44.3, 44.8, 45.1, 45.4, 45.8, 46.1, 45.9];
        let series = calculate_rsi(&table_from_closes(&closes), 5);
        for p in series.valid_points() {
            let v = p.value.simple().unwrap();
            assert!((0.0..=100.0).contains(&v));
        }
    }

    #[test]
    fn rsi_short_history_is_all_invalid() {
        let series = calculate_rsi(&table_from_closes(&[1.0, 2.0]), 14);
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.valid_points().count(), 0);
    }

    #[test]
    fn rsi_empty_and_zero_period() {
        assert!(calculate_rsi(&PriceTable::default(), 14).values.is_empty());
        assert!(calculate_rsi(&table_from_closes(&[1.0, 2.0]), 0).values.is_empty());
    }
}
