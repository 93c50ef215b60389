use crate::errors::ProviderError;
use crate::types::DistanceMatrix;

/// Internal (ground-truth-free) quality score of a partition.
///
/// Undefined for a single distinct label; callers apply the
/// single-cluster convention (score 0) instead of calling it.
pub trait QualityScorer: Send + Sync {
    fn score(&self, distance: &DistanceMatrix, labels: &[usize]) -> Result<f64, ProviderError>;

    fn name(&self) -> &str;
}
