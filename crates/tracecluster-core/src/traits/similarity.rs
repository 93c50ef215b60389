use crate::errors::ProviderError;
use crate::types::SimilarityMatrix;

/// Turns a graph collection into a symmetric N×N similarity matrix.
///
/// Implementations may normalise over the whole collection, so a matrix
/// computed for one collection must never be reused for another.
pub trait SimilarityProvider<G>: Send + Sync {
    fn similarity(&self, graphs: &[G]) -> Result<SimilarityMatrix, ProviderError>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
