//! Trade rule configuration model.
//!
//! A rule document wraps one [`TradeRule`], which owns a buy and a sell
//! [`TradeSubRule`]. Each sub-rule lists the calculators it needs and an
//! AND-combined list of [`Condition`]s:
//! - `IndicatorRef`: a (calculator name, technical indicator) pair
//! - `ComparisonOperator`: closed set of `>`, `<`, `>=`, `<=`, `=`
//! - `CalculatorKind` / `TechnicalName` / `ParameterName`: enum strings,
//!   matched exactly first and then case-insensitively
//!
//! Keys are PascalCase on the wire to match existing rule files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn parse_named<T: Copy>(
    type_name: &str,
    value: &str,
    all: &[T],
    name_of: impl Fn(T) -> &'static str,
) -> Result<T, String> {
    if value.is_empty() {
        return Err(format!("cannot convert empty string to {type_name}"));
    }
    if value.parse::<i64>().is_ok() {
        return Err(format!("cannot convert '{value}' to {type_name}"));
    }
    all.iter()
        .copied()
        .find(|v| name_of(*v) == value)
        .or_else(|| {
            all.iter()
                .copied()
                .find(|v| name_of(*v).eq_ignore_ascii_case(value))
        })
        .ok_or_else(|| format!("cannot convert '{value}' to {type_name}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CalculatorKind {
    Sma,
    Ema,
    Wma,
    Rsi,
    Macd,
    Bbands,
    Roc,
    Stddev,
    Obv,
    Atr,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 10] = [
        CalculatorKind::Sma,
        CalculatorKind::Ema,
        CalculatorKind::Wma,
        CalculatorKind::Rsi,
        CalculatorKind::Macd,
        CalculatorKind::Bbands,
        CalculatorKind::Roc,
        CalculatorKind::Stddev,
        CalculatorKind::Obv,
        CalculatorKind::Atr,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CalculatorKind::Sma => "SMA",
            CalculatorKind::Ema => "EMA",
            CalculatorKind::Wma => "WMA",
            CalculatorKind::Rsi => "RSI",
            CalculatorKind::Macd => "MACD",
            CalculatorKind::Bbands => "BBANDS",
            CalculatorKind::Roc => "ROC",
            CalculatorKind::Stddev => "STDDEV",
            CalculatorKind::Obv => "OBV",
            CalculatorKind::Atr => "ATR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TechnicalName {
    MovingAverage,
    Rsi,
    Macd,
    MacdSignal,
    MacdHist,
    UpperBand,
    MiddleBand,
    LowerBand,
    Roc,
    Stddev,
    Obv,
    Atr,
}

impl TechnicalName {
    pub const ALL: [TechnicalName; 12] = [
        TechnicalName::MovingAverage,
        TechnicalName::Rsi,
        TechnicalName::Macd,
        TechnicalName::MacdSignal,
        TechnicalName::MacdHist,
        TechnicalName::UpperBand,
        TechnicalName::MiddleBand,
        TechnicalName::LowerBand,
        TechnicalName::Roc,
        TechnicalName::Stddev,
        TechnicalName::Obv,
        TechnicalName::Atr,
    ];

    /// Canonical spelling, also the snapshot key for this output.
    pub fn as_str(self) -> &'static str {
        match self {
            TechnicalName::MovingAverage => "MOVINGAVERAGE",
            TechnicalName::Rsi => "RSI",
            TechnicalName::Macd => "MACD",
            TechnicalName::MacdSignal => "MACDSIGNAL",
            TechnicalName::MacdHist => "MACDHIST",
            TechnicalName::UpperBand => "UPPERBAND",
            TechnicalName::MiddleBand => "MIDDLEBAND",
            TechnicalName::LowerBand => "LOWERBAND",
            TechnicalName::Roc => "ROC",
            TechnicalName::Stddev => "STDDEV",
            TechnicalName::Obv => "OBV",
            TechnicalName::Atr => "ATR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ParameterName {
    Period,
    FastPeriod,
    SlowPeriod,
    SignalPeriod,
    StdDevMultiplier,
}

impl ParameterName {
    pub const ALL: [ParameterName; 5] = [
        ParameterName::Period,
        ParameterName::FastPeriod,
        ParameterName::SlowPeriod,
        ParameterName::SignalPeriod,
        ParameterName::StdDevMultiplier,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParameterName::Period => "Period",
            ParameterName::FastPeriod => "FastPeriod",
            ParameterName::SlowPeriod => "SlowPeriod",
            ParameterName::SignalPeriod => "SignalPeriod",
            ParameterName::StdDevMultiplier => "StdDevMultiplier",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ComparisonOperator {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 5] = [
        ComparisonOperator::Gt,
        ComparisonOperator::Lt,
        ComparisonOperator::Ge,
        ComparisonOperator::Le,
        ComparisonOperator::Eq,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Ge => ">=",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Eq => "=",
        }
    }
}

macro_rules! string_enum_impls {
    ($ty:ident, $label:literal) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_named($label, s, &$ty::ALL, $ty::as_str)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum_impls!(CalculatorKind, "CalculatorKind");
string_enum_impls!(TechnicalName, "TechnicalName");
string_enum_impls!(ParameterName, "ParameterName");

// Operators are symbols: no case folding, no ordinal check.
impl FromStr for ComparisonOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComparisonOperator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("invalid operator '{s}'"))
    }
}

impl TryFrom<String> for ComparisonOperator {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ComparisonOperator> for String {
    fn from(value: ComparisonOperator) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndicatorRef {
    pub calculator_name: String,
    pub technical_indicator_name: TechnicalName,
}

impl IndicatorRef {
    pub fn new(calculator_name: impl Into<String>, technical_indicator_name: TechnicalName) -> Self {
        Self {
            calculator_name: calculator_name.into(),
            technical_indicator_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    pub indicator1: IndicatorRef,
    pub operator: ComparisonOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator2: Option<IndicatorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Condition {
    pub fn against_value(
        indicator1: IndicatorRef,
        operator: ComparisonOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            indicator1,
            operator,
            indicator2: None,
            value: Some(value.into()),
        }
    }

    pub fn against_indicator(
        indicator1: IndicatorRef,
        operator: ComparisonOperator,
        indicator2: IndicatorRef,
    ) -> Self {
        Self {
            indicator1,
            operator,
            indicator2: Some(indicator2),
            value: None,
        }
    }

    /// The literal side, if it is set and not blank.
    pub fn literal(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalculatorParameter {
    pub name: ParameterName,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalculatorConfig {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "CalculatorName")]
    pub kind: CalculatorKind,
    #[serde(default)]
    pub technical_indicators: Vec<TechnicalName>,
    #[serde(default)]
    pub parameters: Vec<CalculatorParameter>,
}

impl CalculatorConfig {
    pub fn parameter(&self, name: ParameterName) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TradeSubRule {
    #[serde(default)]
    pub calculators: Vec<CalculatorConfig>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BankrollConfig {
    #[serde(default)]
    pub max_risk_per_trade: f64,
    #[serde(default)]
    pub min_entry_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TradeRule {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub candle_frequency: String,
    #[serde(default)]
    pub min_profit: f64,
    #[serde(default)]
    pub stop_loss: f64,
    #[serde(default)]
    pub take_profit: f64,
    #[serde(default)]
    pub bankroll: Option<BankrollConfig>,
    #[serde(default)]
    pub buy_rule: Option<TradeSubRule>,
    #[serde(default)]
    pub sell_rule: Option<TradeSubRule>,
}

impl TradeRule {
    /// Buy then sell, labelled the way validation messages name them.
    pub fn sub_rules(&self) -> [(&'static str, Option<&TradeSubRule>); 2] {
        [
            ("BuyRule", self.buy_rule.as_ref()),
            ("SellRule", self.sell_rule.as_ref()),
        ]
    }
}

/// Root of a rule document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TradeRules {
    pub rule: TradeRule,
}
