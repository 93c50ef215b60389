//! # tracecluster-core
//!
//! Foundation crate for trace clustering.
//! Defines the data model, collaborator traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod traits;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::TraceClusterConfig;
pub use errors::{PipelineError, ProviderError};
pub use types::{
    ClusterLabel, ConfusionCounts, DistanceMatrix, LabelSequence, OutlierMask, SimilarityMatrix,
    Trace,
};
