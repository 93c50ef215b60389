//! Collaborator failures: similarity, partitioning, scoring, anomaly detection.

use super::error_code::{self, ErrorCode};

/// Errors returned by an external collaborator.
///
/// These are never retried. The pipeline wraps them in
/// [`PipelineError::Stage`](super::PipelineError::Stage) to name the stage.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} failed: {message}")]
    Failed { provider: String, message: String },

    #[error("{provider} returned {actual} entries, expected {expected}")]
    ShapeMismatch {
        provider: String,
        expected: usize,
        actual: usize,
    },

    #[error("{provider} returned invalid output: {message}")]
    InvalidOutput { provider: String, message: String },

    #[error("{provider} is undefined for this input: {message}")]
    Undefined { provider: String, message: String },
}

impl ProviderError {
    pub fn failed(provider: &str, message: impl Into<String>) -> Self {
        Self::Failed {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn shape(provider: &str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            provider: provider.to_string(),
            expected,
            actual,
        }
    }

    pub fn invalid(provider: &str, message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn undefined(provider: &str, message: impl Into<String>) -> Self {
        Self::Undefined {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

impl ErrorCode for ProviderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Failed { .. } | Self::InvalidOutput { .. } => error_code::PROVIDER_FAILED,
            Self::ShapeMismatch { .. } => error_code::SHAPE_MISMATCH,
            Self::Undefined { .. } => error_code::UNDEFINED_SCORE,
        }
    }
}
