//! Gradient-boosted tree regression over calendar features

use crate::error::{ForecastError, Result};
use crate::features::{FeatureRow, NUM_FEATURES};
use crate::models::{to_matrix, ForecastModel, TrainedForecastModel, TrainingSet};
use statrs::statistics::Statistics;
use std::time::{Duration, Instant};
use tree_math::{BoostedEnsemble, BoostingParams, GradientBoostedRegressor, MathError};

/// Gradient-boosted tree ensemble with squared-error loss
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    /// Name of the model
    name: String,
    regressor: GradientBoostedRegressor,
    /// Fitting budget
    timeout: Option<Duration>,
}

/// Trained gradient boosting model
#[derive(Debug, Clone)]
pub struct TrainedGradientBoosting {
    name: String,
    ensemble: BoostedEnsemble,
}

impl GradientBoosting {
    /// Create a new model with the given hyperparameters
    pub fn new(params: BoostingParams) -> Result<Self> {
        let name = format!(
            "Gradient Boosting (rounds={}, depth={}, eta={})",
            params.n_rounds, params.max_depth, params.learning_rate
        );
        Ok(Self {
            name,
            regressor: GradientBoostedRegressor::new(params)?,
            timeout: None,
        })
    }

    /// Limit how long fitting may take
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn params(&self) -> &BoostingParams {
        self.regressor.params()
    }

    fn check_fit_input(data: &TrainingSet) -> Result<()> {
        if data.is_empty() {
            return Err(ForecastError::InsufficientData(
                "training partition is empty".to_string(),
            ));
        }
        let distinct = data.distinct_rows();
        if distinct < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "need at least 2 distinct feature rows, got {}",
                distinct
            )));
        }
        let variance = data.targets().variance();
        if !(variance > 0.0) {
            return Err(ForecastError::InsufficientData(
                "temperature has zero variance in the training partition".to_string(),
            ));
        }
        Ok(())
    }
}

impl ForecastModel for GradientBoosting {
    type Trained = TrainedGradientBoosting;

    fn train(&self, data: &TrainingSet) -> Result<Self::Trained> {
        Self::check_fit_input(data)?;

        let x = data.feature_matrix()?;
        let started = Instant::now();
        let deadline = self.timeout.map(|t| started + t);

        let ensemble = self
            .regressor
            .fit_until(&x, data.targets(), deadline)
            .map_err(|err| match err {
                MathError::DeadlineExceeded { rounds_completed } => {
                    ForecastError::DeadlineExceeded {
                        rounds_completed,
                        budget_ms: self.timeout.map(|t| t.as_millis() as u64).unwrap_or(0),
                    }
                }
                other => other.into(),
            })?;

        tracing::info!(
            model = %self.name,
            rows = data.len(),
            trees = ensemble.trees().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model fitted"
        );

        Ok(TrainedGradientBoosting {
            name: self.name.clone(),
            ensemble,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedGradientBoosting {
    pub fn ensemble(&self) -> &BoostedEnsemble {
        &self.ensemble
    }

    /// Predict a single feature row
    pub fn predict_one(&self, row: &FeatureRow) -> Result<f64> {
        Ok(self.ensemble.predict_row(&row.to_vec())?)
    }
}

impl TrainedForecastModel for TrainedGradientBoosting {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        debug_assert_eq!(self.ensemble.n_features(), NUM_FEATURES);
        let x = to_matrix(rows)?;
        Ok(self.ensemble.predict(&x)?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
