//! Signal delivery port.

use crate::domain::signal::StrategySignal;

/// Receives every signal the engine emits, synchronously.
pub trait SignalListener: Send + Sync {
    fn on_strategy_signal(&self, signal: &StrategySignal);
}

impl<F> SignalListener for F
where
    F: Fn(&StrategySignal) + Send + Sync,
{
    fn on_strategy_signal(&self, signal: &StrategySignal) {
        self(signal)
    }
}
