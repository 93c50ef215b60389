//! Merges kept-subset cluster labels back into input order.

use tracecluster_core::errors::ProviderError;
use tracecluster_core::types::{ClusterLabel, LabelSequence, OutlierMask};

const RECONCILER: &str = "reconciler";

/// Walk the original positions; masked positions get the outlier sentinel,
/// the rest consume `labels` in order.
///
/// `labels` must hold exactly one entry per unmasked position.
pub fn reconcile(mask: &OutlierMask, labels: &[usize]) -> Result<LabelSequence, ProviderError> {
    let kept = mask.len() - mask.outlier_count();
    if labels.len() != kept {
        return Err(ProviderError::shape(RECONCILER, kept, labels.len()));
    }

    if !mask.has_outliers() {
        return Ok(LabelSequence::from_clusters(labels));
    }

    let mut next = labels.iter();
    let mut merged = Vec::with_capacity(mask.len());
    for &excluded in mask.as_slice() {
        if excluded {
            merged.push(ClusterLabel::Outlier);
        } else {
            match next.next() {
                Some(&id) => merged.push(ClusterLabel::Cluster(id)),
                None => return Err(ProviderError::shape(RECONCILER, kept, labels.len())),
            }
        }
    }
    Ok(LabelSequence::new(merged))
}
