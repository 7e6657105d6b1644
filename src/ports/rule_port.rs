//! Rule document loading and validation ports.

use crate::domain::error::EngineError;
use crate::domain::rule::{TradeRule, TradeRules};
use std::path::Path;

pub trait RuleSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<TradeRules, EngineError>;
}

pub trait RuleValidator: Send + Sync {
    /// Every problem found, not just the first.
    fn validate(&self, rule: &TradeRule) -> Result<(), Vec<String>>;
}
