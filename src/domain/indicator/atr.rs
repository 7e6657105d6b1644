//! Average True Range with Wilder's smoothing.
//!
//! TR[0] = high - low, TR[i] = max(H-L, |H-C[i-1]|, |L-C[i-1]|).
//! Seed is the mean of the first n TRs, then ATR = (prev*(n-1) + TR) / n.
//! Warmup: first (n-1) bars are invalid.

use crate::domain::candle::PriceTable;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorSpec, IndicatorValue};

pub fn calculate_atr(table: &PriceTable, period: usize) -> IndicatorSeries {
    let spec = IndicatorSpec::Atr(period);
    if period == 0 || table.len() < period {
        return IndicatorSeries::empty(spec);
    }

    let mut values = Vec::with_capacity(table.len());
    let mut tr_sum = 0.0;
    let mut atr = 0.0;

    for i in 0..table.len() {
        let (high, low) = (table.high[i], table.low[i]);
        let tr = if i == 0 {
            high - low
        } else {
            let prev = table.close[i - 1];
            (high - low).max((high - prev).abs()).max((low - prev).abs())
        };

        let valid = if i + 1 < period {
            tr_sum += tr;
            false
        } else if i + 1 == period {
            atr = (tr_sum + tr) / period as f64;
            true
        } else {
            atr = (atr * (period - 1) as f64 + tr) / period as f64;
            true
        };

        values.push(IndicatorPoint {
            timestamp: table.time[i],
            valid,
            value: IndicatorValue::Simple(if valid { atr } else { 0.0 }),
        });
    }

    IndicatorSeries { spec, values }
}
