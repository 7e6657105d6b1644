//! Core domain types and logic.

pub mod calculator;
pub mod calculator_registry;
pub mod candle;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod rule;
pub mod rule_eval;
pub mod rule_validation;
pub mod signal;
pub mod strategy_engine;
pub mod value_resolver;
