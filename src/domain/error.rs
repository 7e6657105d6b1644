//! Domain error types.

/// Failure to turn one side of a condition into a number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("Indicator1 '{calculator}' with technical indicator '{indicator}' not found")]
    Indicator1NotFound {
        calculator: String,
        indicator: String,
    },

    #[error("Indicator2 '{calculator}' with technical indicator '{indicator}' not found")]
    Indicator2NotFound {
        calculator: String,
        indicator: String,
    },

    #[error("Value '{value}' not found or could not be parsed")]
    ValueNotFound { value: String },

    #[error("condition must have either Indicator2 or Value specified")]
    MissingOperand,
}

/// Top-level error type for stratbuilder.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("config file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("config file is empty: {path}")]
    ConfigEmpty { path: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("rule {name} failed validation with {count} error(s)")]
    Validation { name: String, count: usize },

    #[error("no strategy registered: every rule failed validation")]
    NoStrategies,

    #[error("invalid {expected} value '{value}' for parameter {parameter} in calculator {calculator}")]
    CalculatorParameter {
        calculator: String,
        parameter: String,
        expected: String,
        value: String,
    },

    #[error("cannot create calculator {name}: {reason}")]
    CalculatorCreate { name: String, reason: String },

    #[error("calculator {name} failed: {reason}")]
    Calculator { name: String, reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&EngineError> for std::process::ExitCode {
    fn from(err: &EngineError) -> Self {
        let code: u8 = match err {
            EngineError::Io(_) => 1,
            EngineError::ConfigParse { .. }
            | EngineError::ConfigNotFound { .. }
            | EngineError::ConfigEmpty { .. }
            | EngineError::ConfigMissing { .. }
            | EngineError::ConfigInvalid { .. }
            | EngineError::Json(_) => 2,
            EngineError::Validation { .. } | EngineError::NoStrategies => 3,
            EngineError::CalculatorParameter { .. }
            | EngineError::CalculatorCreate { .. }
            | EngineError::Calculator { .. } => 4,
            EngineError::Data { .. } => 5,
            EngineError::Evaluation(_) => 6,
        };
        std::process::ExitCode::from(code)
    }
}
