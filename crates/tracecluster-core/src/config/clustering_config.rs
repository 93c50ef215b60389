//! Clustering configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_CLUSTER, DEFAULT_OUTLIER_RATIO};

/// Configuration for outlier filtering and the cluster-count search.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Outlier ratio in [0, 1]. Zero disables outlier detection. Default: 0.0.
    pub outlier_ratio: Option<f64>,
    /// Upper bound on the number of clusters tried. Default: 16.
    pub max_cluster: Option<usize>,
}

impl ClusteringConfig {
    /// Returns the effective outlier ratio, defaulting to 0.0.
    pub fn effective_outlier_ratio(&self) -> f64 {
        self.outlier_ratio.unwrap_or(DEFAULT_OUTLIER_RATIO)
    }

    /// Returns the effective cluster bound, defaulting to 16.
    pub fn effective_max_cluster(&self) -> usize {
        self.max_cluster.unwrap_or(DEFAULT_MAX_CLUSTER)
    }
}
