//! Port traits the domain depends on.

pub mod calculator_port;
pub mod config_port;
pub mod data_port;
pub mod rule_port;
pub mod signal_port;
