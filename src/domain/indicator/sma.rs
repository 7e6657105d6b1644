//! Simple Moving Average.
//!
//! Rolling sum over the last n closes. Warmup: first (n-1) bars are invalid.

use crate::domain::candle::PriceTable;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorSpec, IndicatorValue};

pub fn calculate_sma(table: &PriceTable, period: usize) -> IndicatorSeries {
    if period == 0 || table.is_empty() {
        return IndicatorSeries::empty(IndicatorSpec::Sma(period));
    }

    let mut values = Vec::with_capacity(table.len());
    let mut sum = 0.0;

    for (i, &close) in table.close.iter().enumerate() {
        sum += close;
        if i >= period {
            sum -= table.close[i - period];
        }

        let valid = i + 1 >= period;
        values.push(IndicatorPoint {
            timestamp: table.time[i],
            valid,
            value: IndicatorValue::Simple(if valid { sum / period as f64 } else { 0.0 }),
        });
    }

    IndicatorSeries {
        spec: IndicatorSpec::Sma(period),
        values,
    }
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
    fn sma_warmup() {
        let series = calculate_sma(&table_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3);
        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn sma_rolling_window() {
        let series = calculate_sma(&table_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3);
        assert_relative_eq!(simple(&series, 2), 2.0);
        assert_relative_eq!(simple(&series, 3), 3.0);
        assert_relative_eq!(simple(&series, 4), 4.0);
    }

    #[test]
    fn sma_period_1_tracks_close() {
        let series = calculate_sma(&table_from_closes(&[7.0, 8.5]), 1);
        assert_relative_eq!(simple(&series, 0), 7.0);
        assert_relative_eq!(simple(&series, 1), 8.5);
    }

    #[test]
    fn sma_keeps_timestamps() {
        let table = table_from_closes(&[1.0, 2.0]);
        let series = calculate_sma(&table, 2);
        assert_eq!(series.values[1].timestamp, table.time[1]);
        assert_eq!(series.spec, IndicatorSpec::Sma(2));
    }

    #[test]
    fn sma_period_longer_than_history() {
        let series = calculate_sma(&table_from_closes(&[1.0, 2.0]), 5);
        assert_eq!(series.valid_points().count(), 0);
    }

    #[test]
    fn sma_empty_and_zero_period() {
        assert!(calculate_sma(&PriceTable::default(), 3).values.is_empty());
        assert!(calculate_sma(&table_from_closes(&[1.0]), 0).values.is_empty());
    }
}
