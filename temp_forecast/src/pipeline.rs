//! End-to-end forecast pipeline
//!
//! A [`ForecastPipeline`] turns a raw forecast payload and a
//! [`ForecastRequest`] into a [`ForecastArtifact`]:
//!
//! 1. validate the horizon
//! 2. normalise the payload into a [`TemperatureSeries`]
//! 3. synthesise the hourly horizon after the last observation
//! 4. build calendar features and fit the boosted model on a seeded 80/20 split
//! 5. predict the horizon, render the chart and bundle everything up
//!
//! Each run owns all of its intermediate state, so one pipeline can serve
//! many threads at once.

use crate::chart::{render_chart, EncodedChart};
use crate::config::PipelineConfig;
use crate::data::{Observation, SeriesNormalizer, TemperatureSeries};
use crate::error::{ErrorResponse, ForecastError, Result};
use crate::features::{build_features, positional_features, FeatureRow, FutureFeatureScheme};
use crate::horizon::{synthesize, Horizon};
use crate::metrics::EvaluationReport;
use crate::models::gradient_boosting::{GradientBoosting, TrainedGradientBoosting};
use crate::models::{ForecastModel, TrainedForecastModel, TrainingSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the caller asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Display label, echoed verbatim
    pub city: String,
    /// Horizon length in days, validated by the pipeline
    pub days: i64,
}

impl ForecastRequest {
    pub fn new(city: impl Into<String>, days: i64) -> Self {
        Self {
            city: city.into(),
            days,
        }
    }
}

/// One predicted hourly temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    /// Predicted maximum temperature in °C
    pub temperature: f64,
}

/// Final output of a successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastArtifact {
    pub city: String,
    pub horizon_days: u32,
    pub historical: Vec<Observation>,
    pub forecast: Vec<ForecastPoint>,
    pub chart: EncodedChart,
}

/// Either an artifact or the error payload, serialised without a tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastResponse {
    Artifact(ForecastArtifact),
    Error(ErrorResponse),
}

impl ForecastResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, ForecastResponse::Error(_))
    }
}

/// Stateless forecast pipeline holding only its configuration
#[derive(Debug, Clone, Default)]
pub struct ForecastPipeline {
    config: PipelineConfig,
}

impl ForecastPipeline {
    /// Create a pipeline after validating `config`
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline on a payload given as JSON text
    pub fn run_json_str(&self, payload: &str, request: &ForecastRequest) -> Result<ForecastArtifact> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| ForecastError::MalformedPayload(format!("invalid JSON: {}", e)))?;
        self.run(&value, request)
    }

    /// Run the pipeline on a parsed payload
    pub fn run(&self, payload: &Value, request: &ForecastRequest) -> Result<ForecastArtifact> {
        let horizon = self.resolve_horizon(request.days)?;
        let series = SeriesNormalizer::from_value(payload)?;
        let future = synthesize(series.last_timestamp()?, horizon)?;

        let (trained, report) = self.fit(&series)?;
        tracing::info!(
            city = %request.city,
            mse = report.accuracy.mse,
            mae = report.accuracy.mae,
            rmse = report.accuracy.rmse,
            train_size = report.train_size,
            test_size = report.test_size,
            "holdout evaluation"
        );

        let rows = self.future_features(&series, &future);
        let predictions = trained.predict(&rows)?;

        let forecast: Vec<ForecastPoint> = future
            .into_iter()
            .zip(predictions)
            .map(|(timestamp, temperature)| ForecastPoint {
                timestamp,
                temperature,
            })
            .collect();

        let historical = series.observations()?;
        let chart = render_chart(&request.city, &historical, &forecast, &self.config.chart)?;

        Ok(ForecastArtifact {
            city: request.city.clone(),
            horizon_days: horizon.days(),
            historical,
            forecast,
            chart,
        })
    }

    /// Run the pipeline and fold any failure into an [`ErrorResponse`]
    pub fn respond(&self, payload: &Value, request: &ForecastRequest) -> ForecastResponse {
        match self.run(payload, request) {
            Ok(artifact) => ForecastResponse::Artifact(artifact),
            Err(err) => {
                tracing::warn!(city = %request.city, kind = err.kind(), error = %err, "forecast failed");
                ForecastResponse::Error(err.to_response())
            }
        }
    }

    /// Normalise, fit and score a payload without forecasting
    pub fn fit_and_evaluate(&self, payload: &Value) -> Result<EvaluationReport> {
        let series = SeriesNormalizer::from_value(payload)?;
        let (_, report) = self.fit(&series)?;
        Ok(report)
    }

    fn fit(&self, series: &TemperatureSeries) -> Result<(TrainedGradientBoosting, EvaluationReport)> {
        let data = TrainingSet::from_series(series)?;
        let model = GradientBoosting::new(self.config.boosting.clone())?
            .with_timeout(self.config.fit_timeout());
        model.fit_and_evaluate(&data, self.config.test_ratio, self.config.split_seed)
    }

    fn resolve_horizon(&self, days: i64) -> Result<Horizon> {
        let horizon = Horizon::new(days)?;
        if let Some(max) = self.config.max_horizon_days {
            if horizon.days() > max {
                return Err(ForecastError::InvalidHorizon(format!(
                    "{} days exceeds the maximum of {}",
                    horizon.days(),
                    max
                )));
            }
        }
        if horizon.days() > self.config.horizon_warn_days {
            tracing::warn!(
                days = horizon.days(),
                threshold = self.config.horizon_warn_days,
                "long horizon, forecast quality degrades with distance"
            );
        }
        Ok(horizon)
    }

    fn future_features(
        &self,
        series: &TemperatureSeries,
        future: &[DateTime<Utc>],
    ) -> Vec<FeatureRow> {
        match self.config.future_features {
            FutureFeatureScheme::Calendar => build_features(future),
            FutureFeatureScheme::Positional => {
                tracing::warn!("positional future features do not follow the calendar month");
                positional_features(series.len(), future.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_pipeline_is_send_sync() {
        assert_send_sync::<ForecastPipeline>();
    }

    #[test]
    fn test_horizon_checked_before_payload() {
        let pipeline = ForecastPipeline::default();
        let err = pipeline
            .run(&Value::Null, &ForecastRequest::new("Jakarta", 0))
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidHorizon(_)));
    }

    #[test]
    fn test_horizon_overflow_checked_before_fitting() {
        // a single observation would fail fitting with InsufficientData
        let last = DateTime::<Utc>::MAX_UTC - chrono::Duration::hours(2);
        let payload = serde_json::json!({"list": [
            {"dt": last.timestamp(), "main": {"temp_max": 20.0}}
        ]});
        let pipeline = ForecastPipeline::default();

        let err = pipeline
            .run(&payload, &ForecastRequest::new("Jakarta", 1))
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidHorizon(_)), "{:?}", err);
        assert!(matches!(
            pipeline.fit_and_evaluate(&payload),
            Err(ForecastError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_oversized_horizon_is_an_error() {
        let err = ForecastPipeline::default()
            .run(&Value::Null, &ForecastRequest::new("Jakarta", 4_000_000_000))
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidHorizon(_)));
    }

    #[test]
    fn test_max_horizon() {
        let config = PipelineConfig {
            max_horizon_days: Some(7),
            ..PipelineConfig::default()
        };
        let pipeline = ForecastPipeline::new(config).unwrap();
        assert!(pipeline.resolve_horizon(7).is_ok());
        assert!(matches!(
            pipeline.resolve_horizon(8),
            Err(ForecastError::InvalidHorizon(_))
        ));
    }
}
