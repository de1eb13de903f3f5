//! Gradient boosting with squared-error loss
//!
//! Each round fits a [`RegressionTree`] to the gradients of the current
//! ensemble and adds it, shrunk by the learning rate. With squared error the
//! gradient is `prediction - target` and the hessian is constant 1, so the
//! hessian sum of a node equals its row count.

use crate::matrix::FeatureMatrix;
use crate::tree::{RegressionTree, TreeBuilder, TreeParams};
use crate::{MathError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Hyperparameters of the boosted ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingParams {
    /// Fraction of feature columns sampled for each tree
    pub colsample_bytree: f64,
    /// Shrinkage applied to every leaf value
    pub learning_rate: f64,
    pub max_depth: usize,
    /// L1 regularisation on leaf weights
    pub alpha: f64,
    /// L2 regularisation on leaf weights
    pub lambda: f64,
    /// Minimum hessian sum required in each child of a split
    pub min_child_weight: f64,
    pub min_split_gain: f64,
    /// Number of boosting rounds
    pub n_rounds: usize,
    /// Seed for column subsampling
    pub seed: u64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            colsample_bytree: 0.3,
            learning_rate: 0.1,
            max_depth: 5,
            alpha: 10.0,
            lambda: 1.0,
            min_child_weight: 1.0,
            min_split_gain: 0.0,
            n_rounds: 100,
            seed: 0,
        }
    }
}

impl BoostingParams {
    /// Check every parameter is inside its valid range
    pub fn validate(&self) -> Result<()> {
        if !(self.colsample_bytree > 0.0 && self.colsample_bytree <= 1.0) {
            return Err(MathError::InvalidParameter(format!(
                "colsample_bytree must be in (0, 1], got {}",
                self.colsample_bytree
            )));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(MathError::InvalidParameter(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if self.max_depth == 0 {
            return Err(MathError::InvalidParameter(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.n_rounds == 0 {
            return Err(MathError::InvalidParameter(
                "n_rounds must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("alpha", self.alpha),
            ("lambda", self.lambda),
            ("min_child_weight", self.min_child_weight),
            ("min_split_gain", self.min_split_gain),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MathError::InvalidParameter(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Number of columns each tree sees: `max(1, floor(colsample * n_features))`
    pub fn columns_per_tree(&self, n_features: usize) -> usize {
        let k = (self.colsample_bytree * n_features as f64).floor() as usize;
        k.clamp(1, n_features.max(1))
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            alpha: self.alpha,
            lambda: self.lambda,
            min_child_weight: self.min_child_weight,
            min_split_gain: self.min_split_gain,
            learning_rate: self.learning_rate,
        }
    }
}

/// Unfitted gradient-boosted regressor
#[derive(Debug, Clone)]
pub struct GradientBoostedRegressor {
    params: BoostingParams,
}

impl GradientBoostedRegressor {
    /// Create a regressor after validating its parameters
    pub fn new(params: BoostingParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &BoostingParams {
        &self.params
    }

    /// Fit the ensemble without a time limit
    pub fn fit(&self, x: &FeatureMatrix, y: &[f64]) -> Result<BoostedEnsemble> {
        self.fit_until(x, y, None)
    }

    /// Fit the ensemble, giving up once `deadline` has passed.
    ///
    /// The deadline is checked before every boosting round, so a round that
    /// has started always completes.
    pub fn fit_until(
        &self,
        x: &FeatureMatrix,
        y: &[f64],
        deadline: Option<Instant>,
    ) -> Result<BoostedEnsemble> {
        if x.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit on an empty feature matrix".to_string(),
            ));
        }
        if x.n_rows() != y.len() {
            return Err(MathError::InvalidInput(format!(
                "Feature rows ({}) and targets ({}) differ in length",
                x.n_rows(),
                y.len()
            )));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Targets must be finite".to_string(),
            ));
        }

        let n = y.len();
        let n_features = x.n_features();
        let base_score = y.iter().sum::<f64>() / n as f64;
        let mut predictions = vec![base_score; n];
        let hess = vec![1.0; n];
        let mut grad = vec![0.0; n];

        let k = self.params.columns_per_tree(n_features);
        let tree_params = self.params.tree_params();
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut trees = Vec::with_capacity(self.params.n_rounds);

        for round in 0..self.params.n_rounds {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(MathError::DeadlineExceeded {
                        rounds_completed: round,
                    });
                }
            }

            for i in 0..n {
                grad[i] = predictions[i] - y[i];
            }

            let mut features = rand::seq::index::sample(&mut rng, n_features, k).into_vec();
            features.sort_unstable();

            let tree = TreeBuilder::new(x, &grad, &hess, &features, tree_params).build();
            for (i, p) in predictions.iter_mut().enumerate() {
                *p += tree.predict_row(x.row(i));
            }
            trees.push(tree);
        }

        tracing::debug!(
            rounds = trees.len(),
            rows = n,
            columns_per_tree = k,
            base_score,
            "boosted ensemble fitted"
        );

        Ok(BoostedEnsemble {
            base_score,
            trees,
            n_features,
        })
    }
}

/// A fitted ensemble: `base_score` plus the sum of all tree outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedEnsemble {
    base_score: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl BoostedEnsemble {
    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Predict a single row
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }
        Ok(self.base_score + self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>())
    }

    /// Predict every row of `x`, preserving order
    pub fn predict(&self, x: &FeatureMatrix) -> Result<Vec<f64>> {
        if x.is_empty() {
            return Ok(Vec::new());
        }
        (0..x.n_rows()).map(|i| self.predict_row(x.row(i))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::time::Duration;

    fn exact_params() -> BoostingParams {
        BoostingParams {
            colsample_bytree: 1.0,
            learning_rate: 1.0,
            max_depth: 1,
            alpha: 0.0,
            lambda: 0.0,
            n_rounds: 1,
            ..BoostingParams::default()
        }
    }

    fn seasonal_data() -> (FeatureMatrix, Vec<f64>) {
        let rows: Vec<[f64; 3]> = (0..24 * 28)
            .map(|i| [(i % 24) as f64, ((i / 24) % 7) as f64, 1.0])
            .collect();
        let y: Vec<f64> = rows
            .iter()
            .map(|r| 20.0 + 5.0 * (r[0] * std::f64::consts::PI / 12.0).sin() + r[1])
            .collect();
        (FeatureMatrix::from_rows(&rows).unwrap(), y)
    }

    #[test]
    fn test_default_params() {
        let p = BoostingParams::default();
        assert_eq!(p.colsample_bytree, 0.3);
        assert_eq!(p.learning_rate, 0.1);
        assert_eq!(p.max_depth, 5);
        assert_eq!(p.alpha, 10.0);
        assert_eq!(p.n_rounds, 100);
        assert!(p.validate().is_ok());
    }

    #[rstest]
    #[case(0.3, 3, 1)]
    #[case(0.5, 3, 1)]
    #[case(0.7, 3, 2)]
    #[case(1.0, 3, 3)]
    #[case(0.01, 3, 1)]
    fn test_columns_per_tree(#[case] frac: f64, #[case] n: usize, #[case] expected: usize) {
        let p = BoostingParams {
            colsample_bytree: frac,
            ..BoostingParams::default()
        };
        assert_eq!(p.columns_per_tree(n), expected);
    }

    #[rstest]
    #[case(BoostingParams { colsample_bytree: 0.0, ..BoostingParams::default() })]
    #[case(BoostingParams { learning_rate: 1.5, ..BoostingParams::default() })]
    #[case(BoostingParams { max_depth: 0, ..BoostingParams::default() })]
    #[case(BoostingParams { n_rounds: 0, ..BoostingParams::default() })]
    #[case(BoostingParams { alpha: -1.0, ..BoostingParams::default() })]
    fn test_invalid_params(#[case] params: BoostingParams) {
        assert!(matches!(
            GradientBoostedRegressor::new(params),
            Err(MathError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_single_round_fits_step() {
        let rows: Vec<[f64; 1]> = (0..10).map(|i| [i as f64]).collect();
        let x = FeatureMatrix::from_rows(&rows).unwrap();
        let y: Vec<f64> = (0..10).map(|i| if i < 5 { 0.0 } else { 10.0 }).collect();

        let model = GradientBoostedRegressor::new(exact_params())
            .unwrap()
            .fit(&x, &y)
            .unwrap();

        assert_relative_eq!(model.base_score(), 5.0);
        assert_relative_eq!(model.predict_row(&[1.0]).unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(model.predict_row(&[8.0]).unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_default_params_learn_seasonal_shape() {
        let (x, y) = seasonal_data();
        let model = GradientBoostedRegressor::new(BoostingParams::default())
            .unwrap()
            .fit(&x, &y)
            .unwrap();

        let predictions = model.predict(&x).unwrap();
        let mse = predictions
            .iter()
            .zip(&y)
            .map(|(p, t)| (p - t).powi(2))
            .sum::<f64>()
            / y.len() as f64;
        assert!(mse < 1.0, "mse was {}", mse);
        assert_eq!(model.trees().len(), 100);
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y) = seasonal_data();
        let regressor = GradientBoostedRegressor::new(BoostingParams::default()).unwrap();
        let a = regressor.fit(&x, &y).unwrap();
        let b = regressor.fit(&x, &y).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_expired_deadline() {
        let (x, y) = seasonal_data();
        let regressor = GradientBoostedRegressor::new(BoostingParams::default()).unwrap();
        let result = regressor.fit_until(&x, &y, Some(Instant::now()));
        assert_eq!(
            result.unwrap_err(),
            MathError::DeadlineExceeded {
                rounds_completed: 0
            }
        );

        let generous = Instant::now() + Duration::from_secs(600);
        assert!(regressor.fit_until(&x, &y, Some(generous)).is_ok());
    }

    #[test]
    fn test_shape_errors() {
        let x = FeatureMatrix::from_rows(&[[1.0], [2.0]]).unwrap();
        let regressor = GradientBoostedRegressor::new(BoostingParams::default()).unwrap();
        assert!(matches!(
            regressor.fit(&x, &[1.0]),
            Err(MathError::InvalidInput(_))
        ));

        let empty: Vec<[f64; 1]> = Vec::new();
        let empty = FeatureMatrix::from_rows(&empty).unwrap();
        assert!(matches!(
            regressor.fit(&empty, &[]),
            Err(MathError::InsufficientData(_))
        ));

        let model = regressor.fit(&x, &[1.0, 3.0]).unwrap();
        assert!(model.predict_row(&[1.0, 2.0]).is_err());
    }
}
