//! Calculator parameters and output shapes.

use crate::domain::rule::{ParameterName, TechnicalName};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterValueType {
    Int,
    Double,
}

impl fmt::Display for ParameterValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValueType::Int => write!(f, "integer"),
            ParameterValueType::Double => write!(f, "double"),
        }
    }
}

/// A parameter a calculator kind accepts, with the type its value is
/// coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterConstraint {
    pub name: ParameterName,
    pub value_type: ParameterValueType,
}

impl ParameterConstraint {
    pub const fn int(name: ParameterName) -> Self {
        Self {
            name,
            value_type: ParameterValueType::Int,
        }
    }

    pub const fn double(name: ParameterName) -> Self {
        Self {
            name,
            value_type: ParameterValueType::Double,
        }
    }

    /// Coerce a configured string to this constraint's type. Integers must
    /// fit in 32 bits.
    pub fn coerce(&self, raw: &str) -> Option<ParameterValue> {
        let raw = raw.trim();
        match self.value_type {
            ParameterValueType::Int => raw
                .parse::<i32>()
                .ok()
                .map(|v| ParameterValue::Int(i64::from(v))),
            ParameterValueType::Double => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(ParameterValue::Double),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    Int(i64),
    Double(f64),
}

/// Typed parameters handed to a calculator library.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatorParams {
    values: HashMap<ParameterName, ParameterValue>,
}

impl CalculatorParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: ParameterName, value: ParameterValue) {
        self.values.insert(name, value);
    }

    pub fn with(mut self, name: ParameterName, value: ParameterValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: ParameterName) -> Option<ParameterValue> {
        self.values.get(&name).copied()
    }

    pub fn int_or(&self, name: ParameterName, default: i64) -> i64 {
        match self.get(name) {
            Some(ParameterValue::Int(v)) => v,
            Some(ParameterValue::Double(v)) => v as i64,
            None => default,
        }
    }

    pub fn double_or(&self, name: ParameterName, default: f64) -> f64 {
        match self.get(name) {
            Some(ParameterValue::Double(v)) => v,
            Some(ParameterValue::Int(v)) => v as f64,
            None => default,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One output value, stamped with epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputPoint {
    pub timestamp: i64,
    pub value: f64,
}

/// Named output series in the order the calculator reports them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatorOutput {
    pub outputs: Vec<(TechnicalName, Vec<OutputPoint>)>,
}

impl CalculatorOutput {
    pub fn push(&mut self, name: TechnicalName, points: Vec<OutputPoint>) {
        self.outputs.push((name, points));
    }

    pub fn series(&self, name: TechnicalName) -> Option<&[OutputPoint]> {
        self.outputs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, points)| points.as_slice())
    }

    /// Last value of the last non-empty series.
    pub fn last_value(&self) -> Option<f64> {
        self.outputs
            .iter()
            .filter_map(|(_, points)| points.last())
            .last()
            .map(|p| p.value)
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.iter().all(|(_, points)| points.is_empty())
    }
}
