//! Evaluation configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_F_BETA;

/// Configuration for scoring against ground-truth tags.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Regex locating the ground-truth tag in each trace path.
    /// Evaluation runs only when this is set.
    pub benchmark: Option<String>,
    /// β of the F-measure. Default: 1.0.
    pub f_beta: Option<f64>,
}

impl EvaluationConfig {
    pub fn effective_f_beta(&self) -> f64 {
        self.f_beta.unwrap_or(DEFAULT_F_BETA)
    }

    /// The benchmark pattern, treating an empty string as unset.
    pub fn benchmark_pattern(&self) -> Option<&str> {
        self.benchmark.as_deref().filter(|p| !p.is_empty())
    }
}
