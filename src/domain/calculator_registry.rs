//! Calculator registry and indicator pipeline.
//!
//! Calculators are created through a [`CalculatorLibrary`] from the configs
//! in a sub-rule and keyed by their configured name. Re-registering a name
//! replaces the earlier instance.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, error, warn};

use crate::domain::calculator::CalculatorParams;
use crate::domain::candle::{Candle, PriceTable};
use crate::domain::error::EngineError;
use crate::domain::rule::{CalculatorConfig, TradeSubRule};
use crate::domain::value_resolver::IndicatorSnapshot;
use crate::ports::calculator_port::{Calculator, CalculatorLibrary};

pub struct CalculatorRegistry {
    library: Arc<dyn CalculatorLibrary>,
    calculators: RwLock<HashMap<String, Arc<dyn Calculator>>>,
}

impl CalculatorRegistry {
    pub fn new(library: Arc<dyn CalculatorLibrary>) -> Self {
        Self {
            library,
            calculators: RwLock::new(HashMap::new()),
        }
    }

    /// Registers every calculator of `sub_rule`. A failing calculator is
    /// logged and skipped; the rest are still registered. Returns the
    /// failures.
    pub fn register_calculators(&self, sub_rule: &TradeSubRule) -> Vec<EngineError> {
        let mut failures = Vec::new();
        for config in &sub_rule.calculators {
            if let Err(e) = self.register(config) {
                error!(calculator = %config.name, kind = %config.kind, error = %e, "calculator registration failed");
                failures.push(e);
            }
        }
        failures
    }

    pub fn register(&self, config: &CalculatorConfig) -> Result<(), EngineError> {
        let params = self.build_parameters(config)?;
        let calculator = self
            .library
            .create_calculator(config.kind, &params, &config.name)?;

        self.calculators
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(config.name.clone(), calculator);
        debug!(calculator = %config.name, kind = %config.kind, params = params.len(), "calculator registered");
        Ok(())
    }

    /// Coerces the configured strings to the types the library declares.
    /// Parameters the library does not declare are ignored; declared ones
    /// that are absent fall back to the library's defaults.
    pub fn build_parameters(&self, config: &CalculatorConfig) -> Result<CalculatorParams, EngineError> {
        let mut params = CalculatorParams::new();
        for constraint in self.library.parameter_constraints(config.kind) {
            let Some(raw) = config.parameter(constraint.name) else {
                continue;
            };
            let value = constraint
                .coerce(raw)
                .ok_or_else(|| EngineError::CalculatorParameter {
                    calculator: config.name.clone(),
                    parameter: constraint.name.to_string(),
                    expected: constraint.value_type.to_string(),
                    value: raw.to_string(),
                })?;
            params.insert(constraint.name, value);
        }
        Ok(params)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Calculator>> {
        self.calculators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.calculators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .calculators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Runs every registered calculator over the full history and keeps the
    /// most recent value of each under the calculator's name. With several
    /// output series the last one reported wins.
    pub fn calculate_indicators(&self, candles: &[Candle]) -> IndicatorSnapshot {
        let mut snapshot = IndicatorSnapshot::new();
        if candles.is_empty() {
            warn!("no candle history; indicator snapshot is empty");
            return snapshot;
        }

        let calculators: Vec<(String, Arc<dyn Calculator>)> = self
            .calculators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, calc)| (name.clone(), Arc::clone(calc)))
            .collect();
        if calculators.is_empty() {
            warn!("no calculators registered; indicator snapshot is empty");
            return snapshot;
        }

        let table = PriceTable::from_candles(candles);
        for (name, calculator) in calculators {
            let output = match calculator.calculate(&table) {
                Ok(output) => output,
                Err(e) => {
                    error!(calculator = %name, error = %e, "calculator failed");
                    continue;
                }
            };
            match output.last_value() {
                Some(value) => {
                    snapshot.insert(name, value);
                }
                None => warn!(calculator = %name, bars = table.len(), "calculator produced no values"),
            }
        }
        snapshot
    }
}
