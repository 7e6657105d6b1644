//! On-Balance Volume.

use crate::domain::candle::PriceTable;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorSpec, IndicatorValue};

/// OBV[0] = volume[0]
/// If close[i] > close[i-1]: OBV[i] = OBV[i-1] + volume[i]
/// If close[i] < close[i-1]: OBV[i] = OBV[i-1] - volume[i]
/// If close[i] == close[i-1]: OBV[i] = OBV[i-1]
///
/// No warmup period; all bars are valid.
pub fn calculate_obv(table: &PriceTable) -> IndicatorSeries {
    let mut values = Vec::with_capacity(table.len());
    let mut obv = 0.0;

    for i in 0..table.len() {
        let close = table.close[i];
        if i == 0 {
            obv = table.volume[0];
        } else if close > table.close[i - 1] {
            obv += table.volume[i];
        } else if close < table.close[i - 1] {
            obv -= table.volume[i];
        }

        values.push(IndicatorPoint {
            timestamp: table.time[i],
            valid: true,
            value: IndicatorValue::Simple(obv),
        });
    }

    IndicatorSeries {
        spec: IndicatorSpec::Obv,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::table_from_closes;
    use approx::assert_relative_eq;

    #[test]
    fn obv_accumulates_by_direction() {
        let mut table = table_from_closes(&[10.0, 11.0, 10.5, 10.5, 12.0]);
        table.volume = vec![100.0, 200.0, 50.0, 70.0, 30.0];
        let series = calculate_obv(&table);
        let got: Vec<f64> = series.values.iter().map(|p| p.value.simple().unwrap()).collect();
        assert_eq!(got.len(), 5);
        assert_relative_eq!(got[0], 100.0);
        assert_relative_eq!(got[1], 300.0);
        assert_relative_eq!(got[2], 250.0);
        assert_relative_eq!(got[3], 250.0);
        assert_relative_eq!(got[4], 280.0);
    }

    #[test]
    fn obv_all_valid() {
        let series = calculate_obv(&table_from_closes(&[1.0, 2.0, 3.0]));
        assert!(series.values.iter().all(|p| p.valid));
        assert_eq!(series.spec, IndicatorSpec::Obv);
    }

    #[test]
    fn obv_empty() {
        assert!(calculate_obv(&PriceTable::default()).values.is_empty());
    }
}
