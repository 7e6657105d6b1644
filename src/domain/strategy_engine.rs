//! Strategy orchestration.
//!
//! A [`StrategyEngine`] owns the registered strategies, the calculators they
//! declared and the signal listeners. All three live behind their own
//! `RwLock`, so one engine can be shared across threads.
//!
//! Lifecycle per strategy: load and validate the rule, register it and its
//! calculators, then any number of `calculate_indicators` /
//! `evaluate_strategy` rounds. There is no shutdown step.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{error, info, warn};

use crate::domain::calculator_registry::CalculatorRegistry;
use crate::domain::candle::Candle;
use crate::domain::error::{EngineError, EvaluationError};
use crate::domain::rule::TradeRule;
use crate::domain::rule_eval::evaluate_sub_rule;
use crate::domain::signal::StrategySignal;
use crate::domain::value_resolver::IndicatorSnapshot;
use crate::ports::calculator_port::CalculatorLibrary;
use crate::ports::rule_port::{RuleSource, RuleValidator};
use crate::ports::signal_port::SignalListener;

pub struct StrategyEngine {
    rule_source: Box<dyn RuleSource>,
    validator: Box<dyn RuleValidator>,
    strategies: RwLock<HashMap<String, Arc<TradeRule>>>,
    calculators: CalculatorRegistry,
    listeners: RwLock<Vec<Arc<dyn SignalListener>>>,
}

impl StrategyEngine {
    pub fn new(
        rule_source: Box<dyn RuleSource>,
        validator: Box<dyn RuleValidator>,
        library: Arc<dyn CalculatorLibrary>,
    ) -> Self {
        Self {
            rule_source,
            validator,
            strategies: RwLock::new(HashMap::new()),
            calculators: CalculatorRegistry::new(library),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Loads the rule document at `path` and registers its strategy.
    ///
    /// Load errors are returned. A rule that fails validation is logged and
    /// skipped, and the call still succeeds.
    pub fn initialize(&self, path: &Path) -> Result<(), EngineError> {
        let document = self.rule_source.load(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to load rule document");
            e
        })?;
        self.register_rule(document.rule);
        Ok(())
    }

    /// Validates `rule` and, if it passes, registers it and the calculators
    /// of both sub-rules. Returns whether the rule was registered.
    pub fn register_rule(&self, rule: TradeRule) -> bool {
        if let Err(errors) = self.validator.validate(&rule) {
            for message in &errors {
                error!(strategy = %rule.name, error = %message, "rule validation error");
            }
            return false;
        }

        let name = rule.name.clone();
        let rule = Arc::new(rule);
        self.strategies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.clone(), Arc::clone(&rule));

        let failed: usize = rule
            .sub_rules()
            .into_iter()
            .filter_map(|(_, sub_rule)| sub_rule)
            .map(|sub_rule| self.calculators.register_calculators(sub_rule).len())
            .sum();
        info!(strategy = %name, calculators = self.calculators.len(), failed, "strategy initialized");
        true
    }

    pub fn calculate_indicators(&self, candles: &[Candle]) -> IndicatorSnapshot {
        self.calculators.calculate_indicators(candles)
    }

    /// Evaluates the buy and sell rules of `strategy_name` against `candle`
    /// and `snapshot`. Every listener is notified, in subscription order,
    /// before this returns `true`.
    pub fn evaluate_strategy(
        &self,
        strategy_name: &str,
        candle: &Candle,
        snapshot: &IndicatorSnapshot,
    ) -> bool {
        let Some(rule) = self.strategy(strategy_name) else {
            warn!(strategy = %strategy_name, "strategy not found");
            return false;
        };

        let (is_buy, is_sell) = match evaluate_both(&rule, candle, snapshot) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(strategy = %strategy_name, error = %e, "error evaluating strategy");
                return false;
            }
        };
        if !is_buy && !is_sell {
            return false;
        }

        let signal = StrategySignal::new(strategy_name, candle, is_buy, is_sell);
        info!(
            strategy = %strategy_name,
            product = %signal.product_id,
            buy = is_buy,
            sell = is_sell,
            price = signal.price,
            "strategy signal"
        );
        let listeners: Vec<Arc<dyn SignalListener>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener.on_strategy_signal(&signal);
        }
        true
    }

    pub fn subscribe<L>(&self, listener: L)
    where
        L: SignalListener + 'static,
    {
        self.subscribe_arc(Arc::new(listener));
    }

    pub fn subscribe_arc(&self, listener: Arc<dyn SignalListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    pub fn strategy(&self, name: &str) -> Option<Arc<TradeRule>> {
        self.strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn strategy_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn calculators(&self) -> &CalculatorRegistry {
        &self.calculators
    }
}

fn evaluate_both(
    rule: &TradeRule,
    candle: &Candle,
    snapshot: &IndicatorSnapshot,
) -> Result<(bool, bool), EvaluationError> {
    let buy = evaluate_sub_rule(rule.buy_rule.as_ref(), snapshot, Some(candle))?;
    let sell = evaluate_sub_rule(rule.sell_rule.as_ref(), snapshot, Some(candle))?;
    Ok((buy, sell))
}
