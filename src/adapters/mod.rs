//! Concrete adapter implementations for ports.

pub mod builtin_calculators;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod json_rule_adapter;
