//! HTTP request handlers for the Compensation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::request::{CalculationRequest, QuickTotalRequest, ValidationRequest};
use super::response::{ApiError, ApiErrorResponse, QuickTotalResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/validate", post(validate_handler))
        .route("/quick-total", post(quick_total_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

/// Turns a JSON extraction failure into a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, error).into_response()
}

/// Handler for POST /calculate.
///
/// Runs the full calculation. With `strict` set, a package that fails
/// validation is rejected before any calculation runs.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let calculator = state.calculator();
    if request.strict {
        let report = calculator.validate_inputs(&request.package);
        if !report.is_valid {
            warn!(
                correlation_id = %correlation_id,
                package_id = %request.package.id,
                problems = report.errors.len(),
                "Package rejected by validation"
            );
            return ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::invalid_package(&report.errors),
            )
            .into_response();
        }
    }

    let start_time = Instant::now();
    match calculator.calculate(&request.package).await {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                package_id = %result.package_id,
                total_gross = %result.total_gross,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /validate.
async fn validate_handler(
    State(state): State<AppState>,
    payload: Result<Json<ValidationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let report = state.calculator().validate_inputs(&request.package);
    info!(
        correlation_id = %correlation_id,
        package_id = %request.package.id,
        is_valid = report.is_valid,
        "Validated package"
    );
    json_response(StatusCode::OK, report)
}

/// Handler for POST /quick-total.
async fn quick_total_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuickTotalRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let total = state.calculator().calculate_quick_total(&request.salary).await;
    json_response(StatusCode::OK, QuickTotalResponse { total })
}
