//! Linear model adapter: standard scaler and logistic regression.
//!
//! Plain-`f64` implementations of the model ports, fitted elsewhere and
//! loaded from an artifact (see [`super::artifact`]).

use serde::{Deserialize, Serialize};

use crate::ports::{Classifier, FeatureScaler, Matrix, ModelError};

/// Per-column standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    #[must_use]
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Number of columns the scaler was fitted on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, rows: &[Vec<f64>]) -> Result<Matrix, ModelError> {
        let n = self.n_features();
        rows.iter()
            .map(|row| -> Result<Vec<f64>, ModelError> {
                check_width("scaler input", row, rows, n)?;
                Ok(row
                    .iter()
                    .zip(self.mean.iter().zip(&self.scale))
                    .map(|(x, (mean, scale))| {
                        // Constant columns are only centered.
                        if *scale == 0.0 {
                            x - mean
                        } else {
                            (x - mean) / scale
                        }
                    })
                    .collect())
            })
            .collect()
    }
}

/// Binary logistic regression: `p = sigmoid(w . x + b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    #[must_use]
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }
}

impl Classifier for LogisticRegression {
    fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Matrix, ModelError> {
        let n = self.n_features();
        rows.iter()
            .map(|row| -> Result<Vec<f64>, ModelError> {
                check_width("classifier input", row, rows, n)?;
                let z: f64 = self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, w)| x * w)
                        .sum::<f64>();
                let p = Self::sigmoid(z);
                Ok(vec![1.0 - p, p])
            })
            .collect()
    }
}

fn check_width(
    stage: &'static str,
    row: &[f64],
    rows: &[Vec<f64>],
    expected: usize,
) -> Result<(), ModelError> {
    if row.len() == expected {
        Ok(())
    } else {
        Err(ModelError::Shape {
            stage,
            expected_rows: rows.len(),
            expected_cols: expected,
            actual: ModelError::describe_shape(rows),
        })
    }
}
