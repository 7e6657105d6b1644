//! Engine run settings and their validation.
//!
//! Settings come from an INI file and may be overridden from the command
//! line before validation runs.

use std::path::PathBuf;

use crate::domain::error::EngineError;
use crate::logging::{DEFAULT_LEVEL, LogFormat, LoggingSettings};
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineSettings {
    pub rules: Vec<PathBuf>,
    pub strategy: Option<String>,
    pub candles: Option<PathBuf>,
    pub product: Option<String>,
    pub logging: LoggingSettings,
}

impl EngineSettings {
    /// Reads whatever is present; missing keys stay empty.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, EngineError> {
        let format = match non_blank(config, "logging", "format") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|reason| EngineError::ConfigInvalid {
                section: "logging".to_string(),
                key: "format".to_string(),
                reason,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            rules: config
                .get_list("engine", "rules")
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            strategy: non_blank(config, "engine", "strategy"),
            candles: non_blank(config, "data", "candles").map(PathBuf::from),
            product: non_blank(config, "data", "product"),
            logging: LoggingSettings {
                level: non_blank(config, "logging", "level")
                    .unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
                format,
            },
        })
    }
}

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<EngineSettings, EngineError> {
    let settings = EngineSettings::from_config(config)?;
    validate_engine_settings(&settings)?;
    Ok(settings)
}

pub fn validate_engine_settings(settings: &EngineSettings) -> Result<(), EngineError> {
    validate_rules(settings)?;
    validate_candles(settings)?;
    validate_level(settings)?;
    Ok(())
}

fn validate_rules(settings: &EngineSettings) -> Result<(), EngineError> {
    if settings.rules.is_empty() {
        return Err(EngineError::ConfigMissing {
            section: "engine".to_string(),
            key: "rules".to_string(),
        });
    }
    Ok(())
}

fn validate_candles(settings: &EngineSettings) -> Result<(), EngineError> {
    if settings.candles.is_none() {
        return Err(EngineError::ConfigMissing {
            section: "data".to_string(),
            key: "candles".to_string(),
        });
    }
    Ok(())
}

fn validate_level(settings: &EngineSettings) -> Result<(), EngineError> {
    let level = settings.logging.level.trim().to_ascii_lowercase();
    if !["trace", "debug", "info", "warn", "error", "off"].contains(&level.as_str()) {
        return Err(EngineError::ConfigInvalid {
            section: "logging".to_string(),
            key: "level".to_string(),
            reason: format!("unknown level '{}'", settings.logging.level),
        });
    }
    Ok(())
}

fn non_blank(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
