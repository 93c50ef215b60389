//! Evaluation metric errors.

use super::error_code::{self, ErrorCode};

/// Errors that can occur while scoring a clustering against ground truth.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Predicted and ground-truth sequences differ in length: {predicted} vs {truth}")]
    LengthMismatch { predicted: usize, truth: usize },

    #[error("{metric} is undefined for this input (zero denominator)")]
    Undefined { metric: &'static str },

    #[error("No ground-truth tag found in {path}")]
    MissingTag { path: String },

    #[error("Invalid ground-truth pattern: {0}")]
    InvalidPattern(String),
}

impl ErrorCode for MetricsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LengthMismatch { .. } => error_code::LENGTH_MISMATCH,
            _ => error_code::METRICS_ERROR,
        }
    }
}
