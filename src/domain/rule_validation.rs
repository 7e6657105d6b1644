//! Structural validation of trade rules.
//!
//! Collects every problem instead of stopping at the first, so a rule file
//! can be fixed in one pass.

use std::collections::HashSet;

use crate::domain::rule::{TradeRule, TradeSubRule};
use crate::ports::rule_port::RuleValidator;

#[derive(Debug, Clone, Copy, Default)]
pub struct TradeRuleValidator;

impl TradeRuleValidator {
    pub fn new() -> Self {
        Self
    }
}

impl RuleValidator for TradeRuleValidator {
    fn validate(&self, rule: &TradeRule) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if rule.name.trim().is_empty() {
            errors.push("Rule.Name is required.".to_string());
        }
        if rule.candle_frequency.trim().is_empty() {
            errors.push("Rule.CandleFrequency is required.".to_string());
        }
        if rule.min_profit <= 0.0 {
            errors.push("Rule.MinProfit must be greater than 0.".to_string());
        }
        if rule.stop_loss <= 0.0 {
            errors.push("Rule.StopLoss must be greater than 0.".to_string());
        }
        if rule.take_profit <= 0.0 {
            errors.push("Rule.TakeProfit must be greater than 0.".to_string());
        }
        match &rule.bankroll {
            None => errors.push("Bankroll configuration is required.".to_string()),
            Some(bankroll) => {
                if bankroll.max_risk_per_trade <= 0.0 {
                    errors.push("Bankroll.MaxRiskPerTrade must be greater than 0.".to_string());
                }
                if bankroll.min_entry_amount <= 0.0 {
                    errors.push("Bankroll.MinEntryAmount must be greater than 0.".to_string());
                }
            }
        }

        for (label, sub_rule) in rule.sub_rules() {
            match sub_rule {
                Some(sub_rule) => validate_sub_rule(label, sub_rule, &mut errors),
                None => errors.push(format!("{label} is missing.")),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_sub_rule(label: &str, sub_rule: &TradeSubRule, errors: &mut Vec<String>) {
    if sub_rule.calculators.is_empty() {
        errors.push(format!("{label}.Calculators is required and cannot be empty."));
    }
    if sub_rule.conditions.is_empty() {
        errors.push(format!("{label}.Conditions is required and cannot be empty."));
    }

    let mut seen = HashSet::new();
    for calc in &sub_rule.calculators {
        if calc.name.trim().is_empty() {
            errors.push(format!("{label}.Calculator.Name is required."));
        } else if !seen.insert(calc.name.as_str()) {
            errors.push(format!("{label}.Calculator.Name '{}' is duplicated.", calc.name));
        }
        if calc.parameters.is_empty() {
            errors.push(format!(
                "{label}.Calculator.Parameters is required and cannot be empty."
            ));
        }
        for param in &calc.parameters {
            if param.value.trim().is_empty() {
                errors.push(format!("{label}.Calculator.Parameter.Value is required."));
            }
        }
    }

    for condition in &sub_rule.conditions {
        if condition.indicator2.is_none() && condition.literal().is_none() {
            errors.push(format!(
                "{label}.Condition must have either Indicator2 or Value specified."
            ));
        }
    }
}
