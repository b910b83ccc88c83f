//! Request types for the Compensation Engine API.

use serde::{Deserialize, Serialize};

use crate::models::{CompensationPackage, SalaryData};

/// Request body for the `/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The package to calculate.
    pub package: CompensationPackage,
    /// Reject the package when validation reports any problem.
    #[serde(default)]
    pub strict: bool,
}

/// Request body for the `/validate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// The package to check.
    pub package: CompensationPackage,
}

/// Request body for the `/quick-total` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickTotalRequest {
    /// The salary being edited.
    pub salary: SalaryData,
}
