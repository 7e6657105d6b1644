//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::adapters::builtin_calculators::BuiltinCalculatorLibrary;
use crate::adapters::csv_adapter::CsvCandleAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_rule_adapter::JsonRuleAdapter;
use crate::domain::config_validation::{EngineSettings, validate_engine_settings};
use crate::domain::error::EngineError;
use crate::domain::rule_validation::TradeRuleValidator;
use crate::domain::signal::StrategySignal;
use crate::domain::strategy_engine::StrategyEngine;
use crate::logging::{LoggingSettings, init_logging};
use crate::ports::data_port::CandleSource;
use crate::ports::rule_port::{RuleSource, RuleValidator};
use crate::ports::signal_port::SignalListener;

#[derive(Parser, Debug)]
#[command(name = "stratbuilder", about = "Declarative trading rule engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate a rule document
    Validate {
        #[arg(short, long)]
        rules: PathBuf,
    },
    /// Evaluate strategies against a candle file
    Run(RunArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// INI file with [engine], [data] and [logging] sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Rule document; repeat for several strategies
    #[arg(short, long)]
    pub rules: Vec<PathBuf>,
    #[arg(long)]
    pub candles: Option<PathBuf>,
    /// Only evaluate this strategy
    #[arg(short, long)]
    pub strategy: Option<String>,
    /// Only use candles of this product
    #[arg(short, long)]
    pub product: Option<String>,
    /// Evaluate every candle in turn instead of only the latest
    #[arg(long)]
    pub replay: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub strategies: usize,
    pub candles: usize,
    pub evaluations: usize,
    pub signals: usize,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Validate { rules } => {
            init_logging(&LoggingSettings::default());
            run_validate(&rules)
        }
        Command::Run(args) => run_strategies(&args),
    }
}

fn run_validate(path: &Path) -> ExitCode {
    eprintln!("Validating rules: {}", path.display());
    match validate_rule_file(path) {
        Ok(errors) if errors.is_empty() => {
            eprintln!("OK");
            ExitCode::SUCCESS
        }
        Ok(errors) => {
            for message in &errors {
                eprintln!("  - {message}");
            }
            let err = EngineError::Validation {
                name: path.display().to_string(),
                count: errors.len(),
            };
            eprintln!("error: {err}");
            (&err).into()
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Every validation message for the document at `path`; empty when valid.
pub fn validate_rule_file(path: &Path) -> Result<Vec<String>, EngineError> {
    let document = JsonRuleAdapter::new().load(path)?;
    Ok(TradeRuleValidator::new()
        .validate(&document.rule)
        .err()
        .unwrap_or_default())
}

fn run_strategies(args: &RunArgs) -> ExitCode {
    let settings = match resolve_settings(args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    init_logging(&settings.logging);

    let printer = |signal: &StrategySignal| match serde_json::to_string(signal) {
        Ok(line) => {
            let mut out = std::io::stdout().lock();
            if let Err(e) = writeln!(out, "{line}") {
                error!(error = %e, "failed to write signal");
            }
        }
        Err(e) => error!(error = %e, "failed to serialize signal"),
    };

    match execute_run(&settings, args.replay, printer) {
        Ok(summary) => {
            eprintln!(
                "{} strategies, {} candles, {} evaluations, {} signals",
                summary.strategies, summary.candles, summary.evaluations, summary.signals
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// INI values first, then command-line flags on top, then validation.
pub fn resolve_settings(args: &RunArgs) -> Result<EngineSettings, EngineError> {
    let mut settings = match &args.config {
        Some(path) => EngineSettings::from_config(&FileConfigAdapter::from_file(path)?)?,
        None => EngineSettings::default(),
    };
    if !args.rules.is_empty() {
        settings.rules = args.rules.clone();
    }
    if let Some(candles) = &args.candles {
        settings.candles = Some(candles.clone());
    }
    if let Some(strategy) = &args.strategy {
        settings.strategy = Some(strategy.clone());
    }
    if let Some(product) = &args.product {
        settings.product = Some(product.clone());
    }
    validate_engine_settings(&settings)?;
    Ok(settings)
}

pub fn build_engine() -> StrategyEngine {
    StrategyEngine::new(
        Box::new(JsonRuleAdapter::new()),
        Box::new(TradeRuleValidator::new()),
        Arc::new(BuiltinCalculatorLibrary::new()),
    )
}

/// Loads every rule file and the candles, then evaluates the selected
/// strategies. `listener` receives each signal as it is emitted.
pub fn execute_run<L>(
    settings: &EngineSettings,
    replay: bool,
    listener: L,
) -> Result<RunSummary, EngineError>
where
    L: SignalListener + 'static,
{
    let engine = build_engine();
    engine.subscribe(listener);
    for path in &settings.rules {
        engine.initialize(path)?;
    }

    let strategies = select_strategies(&engine, settings.strategy.as_deref())?;

    let candles_path = settings.candles.as_ref().ok_or_else(|| EngineError::ConfigMissing {
        section: "data".to_string(),
        key: "candles".to_string(),
    })?;
    let candles = CsvCandleAdapter::new(candles_path).fetch_candles(settings.product.as_deref())?;
    if candles.is_empty() {
        return Err(EngineError::Data {
            reason: format!("no candles in {}", candles_path.display()),
        });
    }
    info!(strategies = strategies.len(), candles = candles.len(), replay, "starting run");

    let mut summary = RunSummary {
        strategies: strategies.len(),
        candles: candles.len(),
        ..RunSummary::default()
    };
    let start = if replay { 0 } else { candles.len() - 1 };
    for end in start..candles.len() {
        let history = &candles[..=end];
        let snapshot = engine.calculate_indicators(history);
        for name in &strategies {
            summary.evaluations += 1;
            if engine.evaluate_strategy(name, &candles[end], &snapshot) {
                summary.signals += 1;
            }
        }
    }
    Ok(summary)
}

fn select_strategies(engine: &StrategyEngine, filter: Option<&str>) -> Result<Vec<String>, EngineError> {
    let registered = engine.strategy_names();
    if registered.is_empty() {
        warn!("no strategy passed validation");
        return Err(EngineError::NoStrategies);
    }
    match filter {
        None => Ok(registered),
        Some(name) if registered.iter().any(|r| r == name) => Ok(vec![name.to_string()]),
        Some(name) => Err(EngineError::ConfigInvalid {
            section: "engine".to_string(),
            key: "strategy".to_string(),
            reason: format!("strategy '{name}' is not registered"),
        }),
    }
}
