//! JSON rule document adapter.

use std::fs;
use std::path::Path;

use crate::domain::error::EngineError;
use crate::domain::rule::TradeRules;
use crate::ports::rule_port::RuleSource;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRuleAdapter;

impl JsonRuleAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn from_json(json: &str, source: &str) -> Result<TradeRules, EngineError> {
        if json.trim().is_empty() {
            return Err(EngineError::ConfigEmpty {
                path: source.to_string(),
            });
        }
        serde_json::from_str(json).map_err(|e| EngineError::ConfigParse {
            file: source.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn to_json(rules: &TradeRules) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(rules)?)
    }

    pub fn save_to_file(rules: &TradeRules, path: &Path) -> Result<(), EngineError> {
        let json = Self::to_json(rules)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl RuleSource for JsonRuleAdapter {
    fn load(&self, path: &Path) -> Result<TradeRules, EngineError> {
        let shown = path.display().to_string();
        if shown.trim().is_empty() {
            return Err(EngineError::ConfigInvalid {
                section: "engine".to_string(),
                key: "rules".to_string(),
                reason: "rule file path is empty".to_string(),
            });
        }
        if !path.is_file() {
            return Err(EngineError::ConfigNotFound { path: shown });
        }
        let json = fs::read_to_string(path)?;
        Self::from_json(&json, &shown)
    }
}
