//! # Temp Forecast
//!
//! A Rust library for short-range hourly maximum-temperature forecasting from
//! OpenWeather-style 5-day/3-hour forecast payloads.
//!
//! ## Features
//!
//! - Payload normalisation into a sorted, de-duplicated `Temp_Max` series
//! - Calendar features (hour, weekday, month) for every timestamp
//! - Gradient-boosted regression trees with a seeded holdout evaluation
//! - Hourly horizon synthesis after the last observation
//! - SVG chart of actual vs. forecast temperature, base64 encoded
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use temp_forecast::{ForecastPipeline, ForecastRequest};
//!
//! # fn main() -> Result<(), temp_forecast::ForecastError> {
//! let payload = serde_json::json!({
//!     "list": [
//!         {"dt": 1_700_000_000, "main": {"temp_max": 27.5}},
//!         {"dt": 1_700_003_600, "main": {"temp_max": 28.1}}
//!     ]
//! });
//!
//! let pipeline = ForecastPipeline::default();
//! let artifact = pipeline.run(&payload, &ForecastRequest::new("Jakarta", 1))?;
//!
//! println!("{} hourly points", artifact.forecast.len());
//! println!("{}", artifact.chart.data_uri());
//! # Ok(())
//! # }
//! ```
//!
//! Failures can be folded into the `{"error": ...}` payload with
//! [`ForecastPipeline::respond`].

pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod horizon;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use crate::chart::{render_chart, EncodedChart};
pub use crate::config::{ChartConfig, PipelineConfig};
pub use crate::data::{Observation, SeriesNormalizer, TemperatureSeries};
pub use crate::error::{ErrorResponse, ForecastError, Result};
pub use crate::features::{build_features, FeatureRow, FutureFeatureScheme};
pub use crate::horizon::{synthesize, Horizon};
pub use crate::metrics::{EvaluationReport, ForecastAccuracy};
pub use crate::models::{ForecastModel, TrainedForecastModel, TrainingSet};
pub use crate::pipeline::{
    ForecastArtifact, ForecastPipeline, ForecastPoint, ForecastRequest, ForecastResponse,
};
pub use tree_math::BoostingParams;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
