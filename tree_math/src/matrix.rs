//! Dense row-major feature matrix

use crate::{MathError, Result};
use std::collections::HashSet;

/// Row-major matrix of `f64` features with a fixed column count
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Vec<f64>,
    n_rows: usize,
    n_features: usize,
}

impl FeatureMatrix {
    /// Build a matrix from equally sized rows
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let n_features = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if rows.is_empty() {
            return Ok(Self {
                data: Vec::new(),
                n_rows: 0,
                n_features,
            });
        }
        if n_features == 0 {
            return Err(MathError::InvalidInput(
                "Rows must contain at least one feature".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(rows.len() * n_features);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n_features {
                return Err(MathError::InvalidInput(format!(
                    "Row {} has {} features, expected {}",
                    i,
                    row.len(),
                    n_features
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(MathError::InvalidInput(format!(
                    "Row {} contains a non-finite feature value",
                    i
                )));
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            data,
            n_rows: rows.len(),
            n_features,
        })
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Borrow one row
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.n_features;
        &self.data[start..start + self.n_features]
    }

    /// Value of `feature` in row `i`
    pub fn value(&self, i: usize, feature: usize) -> f64 {
        self.data[i * self.n_features + feature]
    }

    /// Count rows that differ in at least one feature
    pub fn distinct_rows(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.n_rows);
        for i in 0..self.n_rows {
            let key: Vec<u64> = self.row(i).iter().map(|v| v.to_bits()).collect();
            seen.insert(key);
        }
        seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let m = FeatureMatrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.n_features(), 3);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.value(0, 2), 3.0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            FeatureMatrix::from_rows(&rows),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(FeatureMatrix::from_rows(&[[f64::NAN, 1.0]]).is_err());
    }

    #[test]
    fn test_distinct_rows() {
        let m = FeatureMatrix::from_rows(&[[1.0, 2.0], [1.0, 2.0], [2.0, 2.0]]).unwrap();
        assert_eq!(m.distinct_rows(), 2);
    }

    #[test]
    fn test_empty() {
        let rows: Vec<Vec<f64>> = Vec::new();
        let m = FeatureMatrix::from_rows(&rows).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.distinct_rows(), 0);
    }
}
