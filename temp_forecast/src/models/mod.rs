//! Regression models mapping calendar features to temperature

use crate::data::TemperatureSeries;
use crate::error::{ForecastError, Result};
use crate::features::{build_features, FeatureRow};
use crate::metrics::{forecast_accuracy, EvaluationReport, ForecastAccuracy};
use crate::utils::train_test_split;
use std::collections::HashSet;
use std::fmt::Debug;
use tree_math::FeatureMatrix;

/// Paired feature rows and temperature targets
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    rows: Vec<FeatureRow>,
    targets: Vec<f64>,
}

impl TrainingSet {
    /// Create a training set from matching rows and targets
    pub fn new(rows: Vec<FeatureRow>, targets: Vec<f64>) -> Result<Self> {
        if rows.len() != targets.len() {
            return Err(ForecastError::InsufficientData(format!(
                "Feature rows ({}) don't match targets ({})",
                rows.len(),
                targets.len()
            )));
        }
        Ok(Self { rows, targets })
    }

    /// Build features for every observation of a series
    pub fn from_series(series: &TemperatureSeries) -> Result<Self> {
        let rows = build_features(&series.timestamps()?);
        Self::new(rows, series.temperatures()?)
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct feature rows
    pub fn distinct_rows(&self) -> usize {
        self.rows.iter().collect::<HashSet<_>>().len()
    }

    /// Shuffle and split into (train, test) partitions
    pub fn split(&self, test_ratio: f64, seed: u64) -> (TrainingSet, TrainingSet) {
        let pairs: Vec<(FeatureRow, f64)> = self
            .rows
            .iter()
            .copied()
            .zip(self.targets.iter().copied())
            .collect();
        let (train, test) = train_test_split(&pairs, test_ratio, seed);
        (Self::from_pairs(train), Self::from_pairs(test))
    }

    fn from_pairs(pairs: Vec<(FeatureRow, f64)>) -> Self {
        let (rows, targets) = pairs.into_iter().unzip();
        Self { rows, targets }
    }

    pub(crate) fn feature_matrix(&self) -> Result<FeatureMatrix> {
        to_matrix(&self.rows)
    }
}

pub(crate) fn to_matrix(rows: &[FeatureRow]) -> Result<FeatureMatrix> {
    let vectors: Vec<_> = rows.iter().map(FeatureRow::to_vec).collect();
    Ok(FeatureMatrix::from_rows(&vectors)?)
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Predict one temperature per feature row, in order
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;

    /// Accuracy on a held-out set
    fn evaluate(&self, holdout: &TrainingSet) -> Result<ForecastAccuracy> {
        let predicted = self.predict(holdout.rows())?;
        forecast_accuracy(&predicted, holdout.targets())
    }
}

/// Forecast model that can be trained on a training set
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model
    fn train(&self, data: &TrainingSet) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;

    /// Split `data`, train on the training partition and score the rest
    fn fit_and_evaluate(
        &self,
        data: &TrainingSet,
        test_ratio: f64,
        seed: u64,
    ) -> Result<(Self::Trained, EvaluationReport)> {
        let (train, test) = data.split(test_ratio, seed);
        let trained = self.train(&train)?;
        let accuracy = trained.evaluate(&test)?;
        Ok((
            trained,
            EvaluationReport {
                accuracy,
                train_size: train.len(),
                test_size: test.len(),
            },
        ))
    }
}

pub mod gradient_boosting;
