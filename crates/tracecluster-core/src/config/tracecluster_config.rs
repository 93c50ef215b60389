//! Top-level configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ClusteringConfig, EvaluationConfig, SimilarityConfig};
use crate::constants::{MIN_CLUSTER_BOUND, PROJECT_CONFIG_FILE};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`TRACECLUSTER_*`)
/// 3. Project config (`tracecluster.toml` in the root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TraceClusterConfig {
    pub clustering: ClusteringConfig,
    pub similarity: SimilarityConfig,
    pub evaluation: EvaluationConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub outlier_ratio: Option<f64>,
    pub max_cluster: Option<usize>,
    pub benchmark: Option<String>,
    /// Explicit config file, read instead of `tracecluster.toml` in the root.
    pub config_file: Option<std::path::PathBuf>,
}

impl TraceClusterConfig {
    /// Load configuration with layered resolution, then validate it.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 3: project config, or the explicit file named on the CLI
        let explicit = cli_overrides.and_then(|cli| cli.config_file.as_deref());
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, path)?;
            }
            None => {
                let project_config_path = root.join(PROJECT_CONFIG_FILE);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1: CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &TraceClusterConfig) -> Result<(), ConfigError> {
        if let Some(ratio) = config.clustering.outlier_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigError::invalid(
                    "clustering.outlier_ratio",
                    "must be between 0.0 and 1.0",
                ));
            }
        }
        if let Some(max_cluster) = config.clustering.max_cluster {
            if max_cluster < MIN_CLUSTER_BOUND {
                return Err(ConfigError::invalid(
                    "clustering.max_cluster",
                    format!("must be at least {MIN_CLUSTER_BOUND}"),
                ));
            }
        }
        if let Some(beta) = config.evaluation.f_beta {
            if !beta.is_finite() || beta <= 0.0 {
                return Err(ConfigError::invalid(
                    "evaluation.f_beta",
                    "must be a positive finite number",
                ));
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut TraceClusterConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: TraceClusterConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut TraceClusterConfig, other: &TraceClusterConfig) {
        // Clustering
        if other.clustering.outlier_ratio.is_some() {
            base.clustering.outlier_ratio = other.clustering.outlier_ratio;
        }
        if other.clustering.max_cluster.is_some() {
            base.clustering.max_cluster = other.clustering.max_cluster;
        }

        // Similarity
        if other.similarity.weighting.is_some() {
            base.similarity.weighting = other.similarity.weighting;
        }
        if other.similarity.include_edges.is_some() {
            base.similarity.include_edges = other.similarity.include_edges;
        }

        // Evaluation
        if other.evaluation.benchmark.is_some() {
            base.evaluation.benchmark = other.evaluation.benchmark.clone();
        }
        if other.evaluation.f_beta.is_some() {
            base.evaluation.f_beta = other.evaluation.f_beta;
        }
    }

    /// Apply environment variable overrides.
    /// Unparsable values are ignored.
    fn apply_env_overrides(config: &mut TraceClusterConfig) {
        if let Ok(val) = std::env::var("TRACECLUSTER_OUTLIER_RATIO") {
            if let Ok(v) = val.parse::<f64>() {
                config.clustering.outlier_ratio = Some(v);
            }
        }
        if let Ok(val) = std::env::var("TRACECLUSTER_MAX_CLUSTER") {
            if let Ok(v) = val.parse::<usize>() {
                config.clustering.max_cluster = Some(v);
            }
        }
        if let Ok(val) = std::env::var("TRACECLUSTER_BENCHMARK") {
            config.evaluation.benchmark = Some(val);
        }
        if let Ok(val) = std::env::var("TRACECLUSTER_F_BETA") {
            if let Ok(v) = val.parse::<f64>() {
                config.evaluation.f_beta = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut TraceClusterConfig, cli: &CliOverrides) {
        if let Some(v) = cli.outlier_ratio {
            config.clustering.outlier_ratio = Some(v);
        }
        if let Some(v) = cli.max_cluster {
            config.clustering.max_cluster = Some(v);
        }
        if let Some(ref v) = cli.benchmark {
            config.evaluation.benchmark = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
