//! Built-in calculator library backed by [`crate::domain::indicator`].
//!
//! | kind   | parameters                                   | outputs                          |
//! |--------|----------------------------------------------|----------------------------------|
//! | SMA    | Period (20)                                  | MOVINGAVERAGE                    |
//! | EMA    | Period (20)                                  | MOVINGAVERAGE                    |
//! | WMA    | Period (20)                                  | MOVINGAVERAGE                    |
//! | RSI    | Period (14)                                  | RSI                              |
//! | MACD   | FastPeriod (12), SlowPeriod (26), SignalPeriod (9) | MACD, MACDSIGNAL, MACDHIST |
//! | BBANDS | Period (20), StdDevMultiplier (2.0)          | UPPERBAND, MIDDLEBAND, LOWERBAND |
//! | ROC    | Period (10)                                  | ROC                              |
//! | STDDEV | Period (20)                                  | STDDEV                           |
//! | OBV    | none                                         | OBV                              |
//! | ATR    | Period (14)                                  | ATR                              |
//!
//! Only warmed-up points are emitted.

use std::sync::Arc;

use crate::domain::calculator::{
    CalculatorOutput, CalculatorParams, OutputPoint, ParameterConstraint,
};
use crate::domain::candle::PriceTable;
use crate::domain::error::EngineError;
use crate::domain::indicator::{
    self, IndicatorSeries, IndicatorSpec, IndicatorValue, bollinger, macd,
};
use crate::domain::rule::{CalculatorKind, ParameterName, TechnicalName};
use crate::ports::calculator_port::{Calculator, CalculatorLibrary};

const DEFAULT_MA_PERIOD: i64 = 20;
const DEFAULT_RSI_PERIOD: i64 = 14;
const DEFAULT_ROC_PERIOD: i64 = 10;
const DEFAULT_ATR_PERIOD: i64 = 14;

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCalculatorLibrary;

impl BuiltinCalculatorLibrary {
    pub fn new() -> Self {
        Self
    }

    fn spec_for(
        kind: CalculatorKind,
        params: &CalculatorParams,
        name: &str,
    ) -> Result<IndicatorSpec, EngineError> {
        let period = |default: i64| positive(params, ParameterName::Period, default, name);
        let spec = match kind {
            CalculatorKind::Sma => IndicatorSpec::Sma(period(DEFAULT_MA_PERIOD)?),
            CalculatorKind::Ema => IndicatorSpec::Ema(period(DEFAULT_MA_PERIOD)?),
            CalculatorKind::Wma => IndicatorSpec::Wma(period(DEFAULT_MA_PERIOD)?),
            CalculatorKind::Rsi => IndicatorSpec::Rsi(period(DEFAULT_RSI_PERIOD)?),
            CalculatorKind::Roc => IndicatorSpec::Roc(period(DEFAULT_ROC_PERIOD)?),
            CalculatorKind::Stddev => IndicatorSpec::Stddev(period(DEFAULT_MA_PERIOD)?),
            CalculatorKind::Atr => IndicatorSpec::Atr(period(DEFAULT_ATR_PERIOD)?),
            CalculatorKind::Obv => IndicatorSpec::Obv,
            CalculatorKind::Macd => {
                let fast = positive(params, ParameterName::FastPeriod, macd::DEFAULT_FAST as i64, name)?;
                let slow = positive(params, ParameterName::SlowPeriod, macd::DEFAULT_SLOW as i64, name)?;
                let signal = positive(
                    params,
                    ParameterName::SignalPeriod,
                    macd::DEFAULT_SIGNAL as i64,
                    name,
                )?;
                if fast >= slow {
                    return Err(EngineError::CalculatorCreate {
                        name: name.to_string(),
                        reason: format!("FastPeriod ({fast}) must be less than SlowPeriod ({slow})"),
                    });
                }
                IndicatorSpec::Macd { fast, slow, signal }
            }
            CalculatorKind::Bbands => {
                let period = period(bollinger::DEFAULT_PERIOD as i64)?;
                let multiplier = params.double_or(
                    ParameterName::StdDevMultiplier,
                    bollinger::DEFAULT_MULTIPLIER,
                );
                if multiplier <= 0.0 {
                    return Err(EngineError::CalculatorCreate {
                        name: name.to_string(),
                        reason: format!("StdDevMultiplier must be positive, got {multiplier}"),
                    });
                }
                IndicatorSpec::Bollinger { period, multiplier }
            }
        };
        Ok(spec)
    }
}

fn positive(
    params: &CalculatorParams,
    parameter: ParameterName,
    default: i64,
    name: &str,
) -> Result<usize, EngineError> {
    let value = params.int_or(parameter, default);
    if value <= 0 {
        return Err(EngineError::CalculatorCreate {
            name: name.to_string(),
            reason: format!("{parameter} must be positive, got {value}"),
        });
    }
    Ok(value as usize)
}

impl CalculatorLibrary for BuiltinCalculatorLibrary {
    fn parameter_constraints(&self, kind: CalculatorKind) -> Vec<ParameterConstraint> {
        match kind {
            CalculatorKind::Obv => vec![],
            CalculatorKind::Macd => vec![
                ParameterConstraint::int(ParameterName::FastPeriod),
                ParameterConstraint::int(ParameterName::SlowPeriod),
                ParameterConstraint::int(ParameterName::SignalPeriod),
            ],
            CalculatorKind::Bbands => vec![
                ParameterConstraint::int(ParameterName::Period),
                ParameterConstraint::double(ParameterName::StdDevMultiplier),
            ],
            _ => vec![ParameterConstraint::int(ParameterName::Period)],
        }
    }

    fn create_calculator(
        &self,
        kind: CalculatorKind,
        params: &CalculatorParams,
        name: &str,
    ) -> Result<Arc<dyn Calculator>, EngineError> {
        let spec = Self::spec_for(kind, params, name)?;
        Ok(Arc::new(BuiltinCalculator {
            kind,
            spec,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct BuiltinCalculator {
    kind: CalculatorKind,
    spec: IndicatorSpec,
}

impl BuiltinCalculator {
    fn series(&self, table: &PriceTable) -> IndicatorSeries {
        match self.spec {
            IndicatorSpec::Sma(p) => indicator::calculate_sma(table, p),
            IndicatorSpec::Ema(p) => indicator::calculate_ema(table, p),
            IndicatorSpec::Wma(p) => indicator::calculate_wma(table, p),
            IndicatorSpec::Rsi(p) => indicator::calculate_rsi(table, p),
            IndicatorSpec::Roc(p) => indicator::calculate_roc(table, p),
            IndicatorSpec::Atr(p) => indicator::calculate_atr(table, p),
            IndicatorSpec::Stddev(p) => indicator::calculate_stddev(table, p),
            IndicatorSpec::Obv => indicator::calculate_obv(table),
            IndicatorSpec::Macd { fast, slow, signal } => {
                indicator::calculate_macd(table, fast, slow, signal)
            }
            IndicatorSpec::Bollinger { period, multiplier } => {
                indicator::calculate_bollinger(table, period, multiplier)
            }
        }
    }

    fn single_output(&self) -> TechnicalName {
        match self.kind {
            CalculatorKind::Sma | CalculatorKind::Ema | CalculatorKind::Wma => {
                TechnicalName::MovingAverage
            }
            CalculatorKind::Rsi => TechnicalName::Rsi,
            CalculatorKind::Roc => TechnicalName::Roc,
            CalculatorKind::Stddev => TechnicalName::Stddev,
            CalculatorKind::Obv => TechnicalName::Obv,
            CalculatorKind::Atr => TechnicalName::Atr,
            CalculatorKind::Macd => TechnicalName::Macd,
            CalculatorKind::Bbands => TechnicalName::MiddleBand,
        }
    }
}

impl Calculator for BuiltinCalculator {
    fn calculate(&self, table: &PriceTable) -> Result<CalculatorOutput, EngineError> {
        let series = self.series(table);
        let valid: Vec<_> = series.valid_points().collect();
        let column = |pick: fn(&IndicatorValue) -> f64| -> Vec<OutputPoint> {
            valid
                .iter()
                .map(|p| OutputPoint {
                    timestamp: p.timestamp,
                    value: pick(&p.value),
                })
                .collect()
        };

        let mut output = CalculatorOutput::default();
        match series.spec {
            IndicatorSpec::Macd { .. } => {
                output.push(TechnicalName::Macd, column(|v| match v {
                    IndicatorValue::Macd { line, .. } => *line,
                    _ => f64::NAN,
                }));
                output.push(TechnicalName::MacdSignal, column(|v| match v {
                    IndicatorValue::Macd { signal, .. } => *signal,
                    _ => f64::NAN,
                }));
                output.push(TechnicalName::MacdHist, column(|v| match v {
                    IndicatorValue::Macd { histogram, .. } => *histogram,
                    _ => f64::NAN,
                }));
            }
            IndicatorSpec::Bollinger { .. } => {
                output.push(TechnicalName::UpperBand, column(|v| match v {
                    IndicatorValue::Bollinger { upper, .. } => *upper,
                    _ => f64::NAN,
                }));
                output.push(TechnicalName::MiddleBand, column(|v| match v {
                    IndicatorValue::Bollinger { middle, .. } => *middle,
                    _ => f64::NAN,
                }));
                output.push(TechnicalName::LowerBand, column(|v| match v {
                    IndicatorValue::Bollinger { lower, .. } => *lower,
                    _ => f64::NAN,
                }));
            }
            _ => {
                output.push(self.single_output(), column(|v| v.simple().unwrap_or(f64::NAN)));
            }
        }
        Ok(output)
    }
}
