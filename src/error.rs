//! Error types for the Compensation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Only two kinds ever reach a caller of the public calculation API: an
//! unsupported currency pair and the opaque [`EngineError::CalculationFailed`].
//! Everything else is absorbed by the engines (rate fetch failures fall back,
//! invalid figures degrade to zero).

use thiserror::Error;

use crate::models::Currency;

/// The main error type for the Compensation Engine.
///
/// # Example
///
/// ```
/// use compensation_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "config/israel/missing.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: config/israel/missing.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No tax-year table is effective for the requested year.
    #[error("No tax year configuration effective for {year}")]
    TaxYearNotFound {
        /// The requested tax year.
        year: i32,
    },

    /// The requested currency pair has no conversion path.
    #[error("Unsupported conversion from {from} to {to}")]
    UnsupportedConversion {
        /// The source currency.
        from: Currency,
        /// The target currency.
        to: Currency,
    },

    /// A single exchange-rate provider failed to deliver a usable rate.
    #[error("Exchange rate provider '{provider}' failed: {message}")]
    RateUnavailable {
        /// The provider that failed.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A package could not be processed because of inconsistent data.
    #[error("Invalid package field '{field}': {message}")]
    InvalidPackage {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A computed amount no longer fits in a decimal.
    #[error("Amount out of range while computing {operation}")]
    AmountOutOfRange {
        /// What was being computed.
        operation: String,
    },

    /// The full calculation failed. The underlying cause is logged, not exposed.
    #[error("Calculation failed, please check the package inputs")]
    CalculationFailed,
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
