//! HTTP API module for the Compensation Engine.
//!
//! This module provides the REST endpoints for full calculations, package
//! validation and quick estimates.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationRequest, QuickTotalRequest, ValidationRequest};
pub use response::{ApiError, ApiErrorResponse, QuickTotalResponse};
pub use state::AppState;
