//! # Temp Forecast Workspace
//!
//! Umbrella crate re-exporting the workspace members.
//!
//! ## Example
//!
//! ```
//! use temp_forecast_workspace::forecast::{ForecastPipeline, ForecastRequest};
//!
//! let pipeline = ForecastPipeline::default();
//! let err = pipeline
//!     .run(&serde_json::Value::Null, &ForecastRequest::new("Jakarta", 0))
//!     .unwrap_err();
//! assert_eq!(err.kind(), "invalid_horizon");
//! ```

/// Hourly temperature forecasting pipeline
pub use temp_forecast as forecast;

/// Gradient-boosted regression tree kernel
pub use tree_math as trees;
