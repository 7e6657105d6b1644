//! CLI-level tests: INI settings, rule file validation and full runs over
//! CSV candles written to a temp dir.

mod common;

use common::*;
use std::path::PathBuf;
use stratbuilder::cli::{RunArgs, RunSummary, execute_run, resolve_settings, validate_rule_file};
use stratbuilder::domain::config_validation::EngineSettings;
use stratbuilder::domain::error::EngineError;
use stratbuilder::logging::LogFormat;
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        write_file(self.dir.path(), name, content)
    }

    fn settings(&self, rules: Vec<PathBuf>, candles: &[Candle]) -> EngineSettings {
        EngineSettings {
            rules,
            candles: Some(self.file("candles.csv", &candles_csv(candles))),
            ..EngineSettings::default()
        }
    }
}

mod settings {
    use super::*;

    #[test]
    fn ini_values_are_read() {
        let fx = Fixture::new();
        let ini = fx.file(
            "engine.ini",
            "[engine]\nrules = a.json, b.json\nstrategy = Basic\n\
             [data]\ncandles = candles.csv\nproduct = BTC-USD\n\
             [logging]\nlevel = debug\nformat = json\n",
        );
        let args = RunArgs {
            config: Some(ini),
            ..RunArgs::default()
        };

        let settings = resolve_settings(&args).unwrap();
        assert_eq!(
            settings.rules,
            vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
        );
        assert_eq!(settings.strategy.as_deref(), Some("Basic"));
        assert_eq!(settings.candles, Some(PathBuf::from("candles.csv")));
        assert_eq!(settings.product.as_deref(), Some("BTC-USD"));
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn flags_override_ini() {
        let fx = Fixture::new();
        let ini = fx.file(
            "engine.ini",
            "[engine]\nrules = a.json\nstrategy = FromIni\n[data]\ncandles = ini.csv\n",
        );
        let args = RunArgs {
            config: Some(ini),
            rules: vec![PathBuf::from("cli.json")],
            candles: Some(PathBuf::from("cli.csv")),
            strategy: Some("FromCli".to_string()),
            product: Some("ETH-USD".to_string()),
            replay: false,
        };

        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.rules, vec![PathBuf::from("cli.json")]);
        assert_eq!(settings.candles, Some(PathBuf::from("cli.csv")));
        assert_eq!(settings.strategy.as_deref(), Some("FromCli"));
        assert_eq!(settings.product.as_deref(), Some("ETH-USD"));
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn flags_alone_are_enough() {
        let args = RunArgs {
            rules: vec![PathBuf::from("r.json")],
            candles: Some(PathBuf::from("c.csv")),
            ..RunArgs::default()
        };
        let settings = resolve_settings(&args).unwrap();
        assert!(settings.strategy.is_none());
        assert_eq!(settings.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn missing_candles_is_reported() {
        let args = RunArgs {
            rules: vec![PathBuf::from("r.json")],
            ..RunArgs::default()
        };
        let err = resolve_settings(&args).unwrap_err();
        assert!(
            matches!(err, EngineError::ConfigMissing { ref section, ref key } if section == "data" && key == "candles")
        );
    }

    #[test]
    fn missing_ini_file() {
        let fx = Fixture::new();
        let args = RunArgs {
            config: Some(fx.dir.path().join("absent.ini")),
            ..RunArgs::default()
        };
        assert!(matches!(
            resolve_settings(&args),
            Err(EngineError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn bad_log_level_in_ini() {
        let fx = Fixture::new();
        let ini = fx.file(
            "engine.ini",
            "[engine]\nrules = a.json\n[data]\ncandles = c.csv\n[logging]\nlevel = chatty\n",
        );
        let args = RunArgs {
            config: Some(ini),
            ..RunArgs::default()
        };
        let err = resolve_settings(&args).unwrap_err();
        assert!(matches!(err, EngineError::ConfigInvalid { ref key, .. } if key == "level"));
    }
}

mod validate_command {
    use super::*;

    #[test]
    fn valid_document_has_no_messages() {
        let fx = Fixture::new();
        let path = fx.file("basic.json", &basic_rule_json());
        assert!(validate_rule_file(&path).unwrap().is_empty());
    }

    #[test]
    fn invalid_document_lists_every_problem() {
        let fx = Fixture::new();
        let path = fx.file("bad.json", &invalid_rule_json("Broken"));
        let messages = validate_rule_file(&path).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages.contains(&"Rule.StopLoss must be greater than 0.".to_string()));
        assert!(messages.contains(&"Bankroll configuration is required.".to_string()));
    }

    #[test]
    fn unreadable_document_is_an_error() {
        let fx = Fixture::new();
        let empty = fx.file("empty.json", "   ");
        assert!(matches!(
            validate_rule_file(&empty),
            Err(EngineError::ConfigEmpty { .. })
        ));
        assert!(matches!(
            validate_rule_file(&fx.dir.path().join("absent.json")),
            Err(EngineError::ConfigNotFound { .. })
        ));
    }
}

mod run_command {
    use super::*;

    #[test]
    fn latest_candle_only() {
        let fx = Fixture::new();
        let rules = fx.file("basic.json", &basic_rule_json());
        let settings = fx.settings(vec![rules], &rising_candles(25));
        let collector = SignalCollector::new();

        let summary = execute_run(&settings, false, collector.listener()).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                strategies: 1,
                candles: 25,
                evaluations: 1,
                signals: 1,
            }
        );
        let signals = collector.take();
        assert_eq!(signals.len(), 1);
        assert!(signals[0].is_sell);
        assert_eq!(signals[0].price, 25.0);
    }

    #[test]
    fn replay_walks_every_candle() {
        let fx = Fixture::new();
        let rules = fx.file("basic.json", &basic_rule_json());
        let settings = fx.settings(vec![rules], &rising_candles(25));
        let collector = SignalCollector::new();

        let summary = execute_run(&settings, true, collector.listener()).unwrap();
        assert_eq!(summary.evaluations, 25);
        // SMA20 is available from the twentieth candle on.
        assert_eq!(summary.signals, 6);
        let prices: Vec<f64> = collector.take().iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![20.0, 21.0, 22.0, 23.0, 24.0, 25.0]);
    }

    #[test]
    fn strategy_filter_selects_one() {
        let fx = Fixture::new();
        let fast = fx.file("fast.json", &sma_rule_json("Fast", 5));
        let slow = fx.file("slow.json", &sma_rule_json("Slow", 20));
        let mut settings = fx.settings(vec![fast, slow], &rising_candles(25));

        let summary = execute_run(&settings, false, SignalCollector::new().listener()).unwrap();
        assert_eq!(summary.strategies, 2);
        assert_eq!(summary.signals, 2);

        settings.strategy = Some("Fast".to_string());
        let collector = SignalCollector::new();
        let summary = execute_run(&settings, false, collector.listener()).unwrap();
        assert_eq!(summary.strategies, 1);
        assert_eq!(collector.take()[0].strategy_name, "Fast");
    }

    #[test]
    fn unknown_strategy_filter() {
        let fx = Fixture::new();
        let rules = fx.file("basic.json", &basic_rule_json());
        let mut settings = fx.settings(vec![rules], &rising_candles(25));
        settings.strategy = Some("Missing".to_string());

        let err = execute_run(&settings, false, SignalCollector::new().listener()).unwrap_err();
        assert!(matches!(err, EngineError::ConfigInvalid { ref key, .. } if key == "strategy"));
    }

    #[test]
    fn every_rule_invalid() {
        let fx = Fixture::new();
        let rules = fx.file("bad.json", &invalid_rule_json("Broken"));
        let settings = fx.settings(vec![rules], &rising_candles(25));

        let err = execute_run(&settings, false, SignalCollector::new().listener()).unwrap_err();
        assert!(matches!(err, EngineError::NoStrategies));
    }

    #[test]
    fn one_invalid_rule_among_valid_ones() {
        let fx = Fixture::new();
        let good = fx.file("good.json", &basic_rule_json());
        let bad = fx.file("bad.json", &invalid_rule_json("Broken"));
        let settings = fx.settings(vec![good, bad], &rising_candles(25));

        let summary = execute_run(&settings, false, SignalCollector::new().listener()).unwrap();
        assert_eq!(summary.strategies, 1);
    }

    #[test]
    fn missing_rule_file_stops_the_run() {
        let fx = Fixture::new();
        let settings = fx.settings(vec![fx.dir.path().join("absent.json")], &rising_candles(5));
        let err = execute_run(&settings, false, SignalCollector::new().listener()).unwrap_err();
        assert!(matches!(err, EngineError::ConfigNotFound { .. }));
    }

    #[test]
    fn product_with_no_candles_is_a_data_error() {
        let fx = Fixture::new();
        let rules = fx.file("basic.json", &basic_rule_json());
        let mut settings = fx.settings(vec![rules], &rising_candles(25));
        settings.product = Some("ETH-USD".to_string());

        let err = execute_run(&settings, false, SignalCollector::new().listener()).unwrap_err();
        assert!(matches!(err, EngineError::Data { .. }));
    }

    #[test]
    fn product_filter_keeps_matching_rows() {
        let fx = Fixture::new();
        let rules = fx.file("basic.json", &basic_rule_json());
        let mut candles = falling_candles(25);
        candles.extend(rising_candles(3).into_iter().map(|mut c| {
            c.product_id = "ETH-USD".to_string();
            c.open_time += 10_000_000;
            c
        }));
        let mut settings = fx.settings(vec![rules], &candles);
        settings.product = Some("BTC-USD".to_string());

        let collector = SignalCollector::new();
        let summary = execute_run(&settings, false, collector.listener()).unwrap();
        assert_eq!(summary.candles, 25);
        let signals = collector.take();
        assert!(signals[0].is_buy);
        assert_eq!(signals[0].product_id, "BTC-USD");
    }
}
