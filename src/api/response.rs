//! Response types for the Compensation Engine API.
//!
//! This module defines the error response structures and the mapping from
//! [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Response body of the `/quick-total` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickTotalResponse {
    /// Estimated annual total in ILS.
    pub total: Decimal,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a response for a package rejected by validation.
    pub fn invalid_package(errors: &[String]) -> Self {
        Self::with_details(
            "INVALID_PACKAGE",
            format!("Package failed validation with {} problem(s)", errors.len()),
            errors.join("; "),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates an error response with an explicit status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::TaxYearNotFound { .. } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::UnsupportedConversion { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("UNSUPPORTED_CONVERSION", message),
            ),
            EngineError::RateUnavailable { .. } => ApiErrorResponse::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("RATE_UNAVAILABLE", message),
            ),
            EngineError::InvalidPackage { field, .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details("INVALID_PACKAGE", message, field),
            ),
            EngineError::AmountOutOfRange { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("AMOUNT_OUT_OF_RANGE", message),
            ),
            EngineError::CalculationFailed => ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("CALCULATION_FAILED", message),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_invalid_package_joins_problems() {
        let error = ApiError::invalid_package(&[
            "Salary must be greater than zero".to_string(),
            "Vacation days must be between 0 and 50".to_string(),
        ]);
        assert_eq!(error.code, "INVALID_PACKAGE");
        assert!(error.message.contains("2 problem(s)"));
        assert_eq!(
            error.details.as_deref(),
            Some("Salary must be greater than zero; Vacation days must be between 0 and 50")
        );
    }

    #[test]
    fn test_calculation_failed_maps_to_422() {
        let response: ApiErrorResponse = EngineError::CalculationFailed.into();
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.error.code, "CALCULATION_FAILED");
    }

    #[test]
    fn test_unsupported_conversion_maps_to_400() {
        let response: ApiErrorResponse = EngineError::UnsupportedConversion {
            from: Currency::Eur,
            to: Currency::Ils,
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.message, "Unsupported conversion from EUR to ILS");
    }

    #[test]
    fn test_config_errors_map_to_500() {
        let response: ApiErrorResponse = EngineError::TaxYearNotFound { year: 2019 }.into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "CONFIG_ERROR");
    }
}
