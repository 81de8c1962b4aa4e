//! Model provider port: Traits for the fitted scaler and classifier.
//!
//! These traits abstract the ML runtime from the decision logic. Both operate
//! on row-major matrices so the engine can pass a single-row batch and check
//! the shape of what comes back.

/// Row-major matrix: one inner vector per row.
pub type Matrix = Vec<Vec<f64>>;

/// Errors raised by a model provider, or detected by the engine when a
/// provider breaks its output contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Unexpected shape from {stage}: expected {expected_rows}x{expected_cols}, got {actual}")]
    Shape {
        stage: &'static str,
        expected_rows: usize,
        expected_cols: usize,
        actual: String,
    },

    #[error("Non-finite value from {stage} at column {column}")]
    NonFinite { stage: &'static str, column: usize },

    #[error("Probability {0} outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    #[error("Model backend failure: {0}")]
    Backend(String),
}

impl ModelError {
    /// Describe the actual shape of a matrix ("1x3", "0x0", "2x[2, 3]").
    #[must_use]
    pub fn describe_shape(rows: &[Vec<f64>]) -> String {
        let widths: Vec<usize> = rows.iter().map(Vec::len).collect();
        match widths.as_slice() {
            [] => "0x0".to_string(),
            [first, rest @ ..] if rest.iter().all(|w| w == first) => {
                format!("{}x{}", widths.len(), first)
            }
            _ => format!("{}x{:?}", widths.len(), widths),
        }
    }
}

/// Fitted feature scaler.
///
/// Implementations must be side-effect-free for a given input so the engine
/// can be called concurrently.
pub trait FeatureScaler: Send + Sync {
    /// Normalize raw rows. The output has the same shape as the input.
    ///
    /// # Errors
    /// Returns `ModelError` if the rows do not match the fitted width or the
    /// backend fails.
    fn transform(&self, rows: &[Vec<f64>]) -> Result<Matrix, ModelError>;
}

/// Fitted binary classifier.
pub trait Classifier: Send + Sync {
    /// Class probabilities per row: column 0 is the negative class,
    /// column 1 the positive class.
    ///
    /// # Errors
    /// Returns `ModelError` if the rows do not match the fitted width or the
    /// backend fails.
    fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Matrix, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_shape() {
        assert_eq!(ModelError::describe_shape(&[]), "0x0");
        assert_eq!(ModelError::describe_shape(&[vec![0.1, 0.9]]), "1x2");
        assert_eq!(
            ModelError::describe_shape(&[vec![0.1, 0.9], vec![0.5]]),
            "2x[2, 1]"
        );
    }
}
