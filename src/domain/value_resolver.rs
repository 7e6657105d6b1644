//! Resolution of condition operands to numbers.
//!
//! # Indicator references
//!
//! 1. Snapshot key equal to the technical indicator name
//! 2. Snapshot key equal to the calculator name
//! 3. Calculator config with that name, looked up again by its name
//! 4. Candle field named like the calculator (case-insensitive)
//!
//! # Literal values
//!
//! 1. Float literal (always wins over a name)
//! 2. Snapshot key
//! 3. Candle field (case-insensitive)
//! 4. Calculator config lookup, as in step 3 above
//!
//! A literal is trimmed once and every step sees the trimmed text.
//! Indicator reference names are used as written.
//!
//! Without a candle every candle-field step misses instead of yielding 0.

use crate::domain::candle::{Candle, CandleField};
use crate::domain::rule::{CalculatorConfig, IndicatorRef};
use std::collections::HashMap;

/// Most recent value per indicator or calculator name.
pub type IndicatorSnapshot = HashMap<String, f64>;

#[derive(Debug, Clone, Copy)]
pub enum ValueRef<'a> {
    Indicator(&'a IndicatorRef),
    Literal(&'a str),
}

/// Everything an operand can be resolved against.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    pub calculators: &'a [CalculatorConfig],
    pub snapshot: &'a IndicatorSnapshot,
    pub candle: Option<&'a Candle>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(
        calculators: &'a [CalculatorConfig],
        snapshot: &'a IndicatorSnapshot,
        candle: Option<&'a Candle>,
    ) -> Self {
        Self {
            calculators,
            snapshot,
            candle,
        }
    }

    pub fn resolve(&self, value: ValueRef<'_>) -> Option<f64> {
        match value {
            ValueRef::Indicator(ind) => self.resolve_indicator(ind),
            ValueRef::Literal(s) => self.resolve_literal(s),
        }
    }

    pub fn resolve_indicator(&self, ind: &IndicatorRef) -> Option<f64> {
        let calculator_key = ind.calculator_name.as_str();
        self.snapshot
            .get(ind.technical_indicator_name.as_str())
            .or_else(|| self.snapshot.get(calculator_key))
            .copied()
            .or_else(|| legacy_calculator_value(self.calculators, calculator_key, self.snapshot))
            .or_else(|| candle_value(self.candle, calculator_key))
    }

    pub fn resolve_literal(&self, literal: &str) -> Option<f64> {
        let literal = literal.trim();
        if literal.is_empty() {
            return None;
        }
        parse_number(literal)
            .or_else(|| self.snapshot.get(literal).copied())
            .or_else(|| candle_value(self.candle, literal))
            .or_else(|| legacy_calculator_value(self.calculators, literal, self.snapshot))
    }
}

/// Invariant-culture float parse. Non-finite spellings such as `inf` or
/// `NaN` are treated as names, not numbers.
pub fn parse_number(literal: &str) -> Option<f64> {
    literal
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn candle_value(candle: Option<&Candle>, name: &str) -> Option<f64> {
    let candle = candle?;
    CandleField::from_name(name).map(|field| candle.field(field))
}

/// Finds the calculator config called `name` and reads the snapshot under
/// that config's name. Equivalent to a direct snapshot lookup of `name`;
/// kept so existing rule files resolve identically.
// TODO: drop once no rule file is known to depend on this ordering.
pub(crate) fn legacy_calculator_value(
    calculators: &[CalculatorConfig],
    name: &str,
    snapshot: &IndicatorSnapshot,
) -> Option<f64> {
    if name.trim().is_empty() {
        return None;
    }
    let calculator = calculators.iter().find(|c| c.name == name)?;
    snapshot.get(&calculator.name).copied()
}
