//! Configuration system for trace clustering.
//! TOML-based, 4-layer resolution: CLI > env > project > defaults.

pub mod clustering_config;
pub mod evaluation_config;
pub mod similarity_config;
pub mod tracecluster_config;

pub use clustering_config::ClusteringConfig;
pub use evaluation_config::EvaluationConfig;
pub use similarity_config::{SimilarityConfig, Weighting};
pub use tracecluster_config::{CliOverrides, TraceClusterConfig};
