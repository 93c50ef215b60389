//! Pipeline errors: the failure surface of one clustering run.

use std::fmt;

use super::error_code::{self, ErrorCode};
use super::{ConfigError, ProviderError, TraceError};

/// The stage of a clustering run that invoked a failing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Similarity,
    OutlierDetection,
    SimilarityRebuild,
    Partitioning,
    QualityScoring,
}

impl PipelineStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Similarity => "similarity",
            Self::OutlierDetection => "outlier_detection",
            Self::SimilarityRebuild => "similarity_rebuild",
            Self::Partitioning => "partitioning",
            Self::QualityScoring => "quality_scoring",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that abort a clustering run. Nothing survives into the next run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Rejected input: {0}")]
    Config(#[from] ConfigError),

    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    #[error("Stage {stage} failed: {source}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: ProviderError,
    },
}

impl PipelineError {
    pub fn stage(stage: PipelineStage, source: ProviderError) -> Self {
        Self::Stage { stage, source }
    }

    /// The failing stage, if this is a collaborator failure.
    pub fn failed_stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Trace(e) => e.error_code(),
            Self::Stage { source, .. } => source.error_code(),
        }
    }
}
