//! # Tree Math
//!
//! Numeric kernel for gradient-boosted regression trees.
//! This crate provides a dense feature matrix, single regression trees grown
//! by exact greedy split search, and a boosting loop with squared-error loss,
//! L1/L2 regularised leaf weights and per-tree column subsampling.

use thiserror::Error;

pub mod boosting;
pub mod matrix;
pub mod tree;

pub use boosting::{BoostedEnsemble, BoostingParams, GradientBoostedRegressor};
pub use matrix::FeatureMatrix;
pub use tree::{Node, RegressionTree};

/// Errors that can occur while fitting or evaluating tree models
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for fitting: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Fitting deadline exceeded after {rounds_completed} boosting rounds")]
    DeadlineExceeded { rounds_completed: usize },
}

/// Result type for tree math operations
pub type Result<T> = std::result::Result<T, MathError>;
