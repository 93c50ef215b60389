use crate::errors::ProviderError;
use crate::types::SimilarityMatrix;

/// Partitioning primitive: `partition(M, k) -> labels[N]`, `k >= 2`.
pub trait Partitioner: Send + Sync {
    fn partition(&self, matrix: &SimilarityMatrix, k: usize) -> Result<Vec<usize>, ProviderError>;

    fn name(&self) -> &str;
}
