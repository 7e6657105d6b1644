//! Rate of Change.
//!
//! ROC(n)[i] = ((C[i] - C[i-n]) / C[i-n]) * 100, and 0 when C[i-n] == 0.
//! Warmup: first n bars invalid.

use crate::domain::candle::PriceTable;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorSpec, IndicatorValue};

pub fn calculate_roc(table: &PriceTable, period: usize) -> IndicatorSeries {
    let spec = IndicatorSpec::Roc(period);
    if period == 0 {
        return IndicatorSeries::empty(spec);
    }

    let closes = &table.close;
    let values = (0..closes.len())
        .map(|i| {
            let valid = i >= period;
            let value = if !valid || closes[i - period] == 0.0 {
                0.0
            } else {
                (closes[i] - closes[i - period]) / closes[i - period] * 100.0
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
