//! Error types for the temp_forecast crate

use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tree_math::MathError;

/// Custom error types for the temp_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The raw payload lacks the expected fields or has the wrong shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The payload parsed but held no observations
    #[error("Empty series: the payload contains no forecast entries")]
    EmptySeries,

    /// Non-positive, non-numeric or oversized day count
    #[error("Invalid horizon: {0}")]
    InvalidHorizon(String),

    /// Too few distinct observations to fit a meaningful model
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Chart construction or encoding failed
    #[error("Render failure: {0}")]
    RenderFailure(String),

    /// Model fitting ran past its time budget
    #[error("Model fitting exceeded its {budget_ms} ms budget after {rounds_completed} rounds")]
    DeadlineExceeded {
        rounds_completed: usize,
        budget_ms: u64,
    },

    /// Error from invalid pipeline configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error from Polars operations
    #[error("Frame error: {0}")]
    Frame(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    /// Stable snake_case code for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::MalformedPayload(_) => "malformed_payload",
            ForecastError::EmptySeries => "empty_series",
            ForecastError::InvalidHorizon(_) => "invalid_horizon",
            ForecastError::InsufficientData(_) => "insufficient_data",
            ForecastError::RenderFailure(_) => "render_failure",
            ForecastError::DeadlineExceeded { .. } => "deadline_exceeded",
            ForecastError::InvalidConfig(_) => "invalid_config",
            ForecastError::Frame(_) => "frame",
        }
    }

    /// Convert into the payload handed back to callers on failure
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::Frame(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            MathError::InvalidParameter(msg) => ForecastError::InvalidConfig(msg),
            MathError::InvalidInput(msg) => ForecastError::InsufficientData(msg),
            MathError::DeadlineExceeded { rounds_completed } => ForecastError::DeadlineExceeded {
                rounds_completed,
                budget_ms: 0,
            },
        }
    }
}

/// Structured failure payload with a single human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
