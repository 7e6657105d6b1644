//! Calculator library port.

use crate::domain::calculator::{CalculatorOutput, CalculatorParams, ParameterConstraint};
use crate::domain::candle::PriceTable;
use crate::domain::error::EngineError;
use crate::domain::rule::CalculatorKind;
use std::sync::Arc;

/// A configured indicator calculator.
pub trait Calculator: Send + Sync {
    fn calculate(&self, table: &PriceTable) -> Result<CalculatorOutput, EngineError>;
}

/// Factory for calculators of each supported kind.
pub trait CalculatorLibrary: Send + Sync {
    fn parameter_constraints(&self, kind: CalculatorKind) -> Vec<ParameterConstraint>;

    fn create_calculator(
        &self,
        kind: CalculatorKind,
        params: &CalculatorParams,
        name: &str,
    ) -> Result<Arc<dyn Calculator>, EngineError>;
}
