//! Condition evaluation.
//!
//! # Evaluation Semantics
//!
//! - A missing sub-rule or an empty condition list is `false`, never an error
//! - Conditions are AND-combined and short-circuit on the first `false`
//! - `=` compares within [`EQUALITY_TOLERANCE`], the others are plain `f64`
//!   comparisons
//! - An operand that cannot be resolved is an [`EvaluationError`] naming
//!   the side that failed

use crate::domain::candle::Candle;
use crate::domain::error::EvaluationError;
use crate::domain::rule::{ComparisonOperator, Condition, IndicatorRef, TradeSubRule};
use crate::domain::value_resolver::{IndicatorSnapshot, ResolutionContext};

/// Absolute tolerance of the `=` operator.
pub const EQUALITY_TOLERANCE: f64 = 1e-6;

pub fn compare(left: f64, operator: ComparisonOperator, right: f64) -> bool {
    match operator {
        ComparisonOperator::Gt => left > right,
        ComparisonOperator::Lt => left < right,
        ComparisonOperator::Ge => left >= right,
        ComparisonOperator::Le => left <= right,
        ComparisonOperator::Eq => (left - right).abs() < EQUALITY_TOLERANCE,
    }
}

pub fn evaluate_sub_rule(
    rule: Option<&TradeSubRule>,
    snapshot: &IndicatorSnapshot,
    candle: Option<&Candle>,
) -> Result<bool, EvaluationError> {
    let Some(rule) = rule else {
        return Ok(false);
    };
    if rule.conditions.is_empty() {
        return Ok(false);
    }

    let ctx = ResolutionContext::new(&rule.calculators, snapshot, candle);
    for condition in &rule.conditions {
        if !evaluate_condition(condition, &ctx)? {
            return Ok(false);
        }
    }
    Ok(true)
}

pub fn evaluate_condition(
    condition: &Condition,
    ctx: &ResolutionContext<'_>,
) -> Result<bool, EvaluationError> {
    let left = ctx.resolve_indicator(&condition.indicator1).ok_or_else(|| {
        let (calculator, indicator) = describe(&condition.indicator1);
        EvaluationError::Indicator1NotFound {
            calculator,
            indicator,
        }
    })?;

    let right = if let Some(indicator2) = &condition.indicator2 {
        ctx.resolve_indicator(indicator2).ok_or_else(|| {
            let (calculator, indicator) = describe(indicator2);
            EvaluationError::Indicator2NotFound {
                calculator,
                indicator,
            }
        })?
    } else if let Some(literal) = condition.literal() {
        ctx.resolve_literal(literal)
            .ok_or_else(|| EvaluationError::ValueNotFound {
                value: literal.to_string(),
            })?
    } else {
        return Err(EvaluationError::MissingOperand);
    };

    Ok(compare(left, condition.operator, right))
}

fn describe(ind: &IndicatorRef) -> (String, String) {
    (
        ind.calculator_name.clone(),
        ind.technical_indicator_name.to_string(),
    )
}
