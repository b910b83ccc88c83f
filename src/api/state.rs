//! Application state for the Compensation Engine API.

use std::sync::Arc;

use crate::calculation::CompensationCalculator;

/// Shared application state.
///
/// Holds the calculator, whose configuration and exchange-rate cache are
/// shared by every request.
#[derive(Clone)]
pub struct AppState {
    calculator: Arc<CompensationCalculator>,
}

impl AppState {
    /// Creates a new application state around a calculator.
    pub fn new(calculator: CompensationCalculator) -> Self {
        Self {
            calculator: Arc::new(calculator),
        }
    }

    /// Returns the shared calculator.
    pub fn calculator(&self) -> &CompensationCalculator {
        &self.calculator
    }
}
