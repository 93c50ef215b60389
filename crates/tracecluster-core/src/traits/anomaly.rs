use crate::errors::ProviderError;
use crate::types::{AnomalyFlag, DistanceMatrix};

/// Anomaly-score primitive: one flag per row of the dissimilarity matrix.
pub trait AnomalyDetector: Send + Sync {
    fn flag(&self, distance: &DistanceMatrix) -> Result<Vec<AnomalyFlag>, ProviderError>;

    fn name(&self) -> &str;
}
