#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use stratbuilder::domain::calculator::{
    CalculatorOutput, CalculatorParams, OutputPoint, ParameterConstraint,
};
pub use stratbuilder::domain::candle::Candle;
use stratbuilder::domain::candle::PriceTable;
use stratbuilder::domain::error::EngineError;
use stratbuilder::domain::rule::{CalculatorKind, ParameterName, TechnicalName};
use stratbuilder::domain::signal::StrategySignal;
use stratbuilder::ports::calculator_port::{Calculator, CalculatorLibrary};

const BASE_TIME_MS: i64 = 1_700_000_000_000;

pub fn make_candle(index: usize, close: f64) -> Candle {
    Candle {
        open_time: BASE_TIME_MS + index as i64 * 60_000,
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1_000.0,
        product_id: "BTC-USD".to_string(),
    }
}

pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_candle(i, c))
        .collect()
}

/// Closes 1, 2, ..., n.
pub fn rising_candles(n: usize) -> Vec<Candle> {
    candles_from_closes(&(1..=n).map(|i| i as f64).collect::<Vec<_>>())
}

/// Closes n, n-1, ..., 1.
pub fn falling_candles(n: usize) -> Vec<Candle> {
    candles_from_closes(&(1..=n).rev().map(|i| i as f64).collect::<Vec<_>>())
}

pub fn candles_csv(candles: &[Candle]) -> String {
    let mut out = String::from("open_time,open,high,low,close,volume,product_id\n");
    for c in candles {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            c.open_time, c.open, c.high, c.low, c.close, c.volume, c.product_id
        ));
    }
    out
}

/// A valid rule: buy when SMA(period) > close, sell when SMA(period) < close.
pub fn sma_rule_json(name: &str, period: u32) -> String {
    format!(
        r#"{{
  "Rule": {{
    "Name": "{name}",
    "CandleFrequency": "1m",
    "MinProfit": 0.01,
    "StopLoss": 0.02,
    "TakeProfit": 0.05,
    "Bankroll": {{ "MaxRiskPerTrade": 0.01, "MinEntryAmount": 10 }},
    "BuyRule": {{
      "Calculators": [
        {{
          "Name": "SMA{period}",
          "CalculatorName": "SMA",
          "TechnicalIndicators": ["MOVINGAVERAGE"],
          "Parameters": [{{ "Name": "Period", "Value": "{period}" }}]
        }}
      ],
      "Conditions": [
        {{
          "Indicator1": {{ "CalculatorName": "SMA{period}", "TechnicalIndicatorName": "MOVINGAVERAGE" }},
          "Operator": ">",
          "Value": "close"
        }}
      ]
    }},
    "SellRule": {{
      "Calculators": [
        {{
          "Name": "SMA{period}",
          "CalculatorName": "SMA",
          "TechnicalIndicators": ["MOVINGAVERAGE"],
          "Parameters": [{{ "Name": "Period", "Value": "{period}" }}]
        }}
      ],
      "Conditions": [
        {{
          "Indicator1": {{ "CalculatorName": "SMA{period}", "TechnicalIndicatorName": "MOVINGAVERAGE" }},
          "Operator": "<",
          "Value": "close"
        }}
      ]
    }}
  }}
}}"#
    )
}

pub fn basic_rule_json() -> String {
    sma_rule_json("BasicStrategy", 20)
}

/// Same shape as [`sma_rule_json`] but with no bankroll and a zero stop loss.
pub fn invalid_rule_json(name: &str) -> String {
    sma_rule_json(name, 20)
        .replace(
            r#""Bankroll": { "MaxRiskPerTrade": 0.01, "MinEntryAmount": 10 },"#,
            "",
        )
        .replace(r#""StopLoss": 0.02"#, r#""StopLoss": 0"#)
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Collects every signal it receives.
#[derive(Clone, Default)]
pub struct SignalCollector {
    pub signals: Arc<Mutex<Vec<StrategySignal>>>,
}

impl SignalCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener(&self) -> impl Fn(&StrategySignal) + Send + Sync + 'static {
        let signals = Arc::clone(&self.signals);
        move |signal: &StrategySignal| signals.lock().unwrap().push(signal.clone())
    }

    pub fn take(&self) -> Vec<StrategySignal> {
        std::mem::take(&mut *self.signals.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.signals.lock().unwrap().len()
    }
}

/// Calculator library with canned results per calculator name.
#[derive(Default)]
pub struct ScriptedLibrary {
    values: HashMap<String, f64>,
    failing: Vec<String>,
    rejected: Vec<String>,
}

impl ScriptedLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator `name` reports `value` as its latest point.
    pub fn with_value(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    /// Calculator `name` is created but errors on every calculation.
    pub fn with_failure(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }

    /// Creating calculator `name` fails.
    pub fn with_rejection(mut self, name: &str) -> Self {
        self.rejected.push(name.to_string());
        self
    }
}

impl CalculatorLibrary for ScriptedLibrary {
    fn parameter_constraints(&self, _kind: CalculatorKind) -> Vec<ParameterConstraint> {
        vec![ParameterConstraint::int(ParameterName::Period)]
    }

    fn create_calculator(
        &self,
        _kind: CalculatorKind,
        _params: &CalculatorParams,
        name: &str,
    ) -> Result<Arc<dyn Calculator>, EngineError> {
        if self.rejected.iter().any(|r| r == name) {
            return Err(EngineError::CalculatorCreate {
                name: name.to_string(),
                reason: "rejected".to_string(),
            });
        }
        Ok(Arc::new(ScriptedCalculator {
            name: name.to_string(),
            value: self.values.get(name).copied(),
            fail: self.failing.iter().any(|f| f == name),
        }))
    }
}

struct ScriptedCalculator {
    name: String,
    value: Option<f64>,
    fail: bool,
}

impl Calculator for ScriptedCalculator {
    fn calculate(&self, table: &PriceTable) -> Result<CalculatorOutput, EngineError> {
        if self.fail {
            return Err(EngineError::Calculator {
                name: self.name.clone(),
                reason: "scripted failure".to_string(),
            });
        }
        let mut output = CalculatorOutput::default();
        let points = match (self.value, table.time.last()) {
            (Some(value), Some(&timestamp)) => vec![OutputPoint { timestamp, value }],
            _ => vec![],
        };
        output.push(TechnicalName::MovingAverage, points);
        Ok(output)
    }
}
