//! Scoring a final label sequence, outliers excluded.

use std::hash::Hash;

use serde::Serialize;
use tracecluster_core::errors::MetricsError;
use tracecluster_core::types::{ClusterLabel, LabelSequence};
use tracing::debug;

use super::{confusion_counts, f_measure, inverse_purity, precision, purity, rand_index, recall};

/// Every metric for one run. `None` marks a metric undefined for the input
/// (zero denominator, or nothing left to score).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Scores {
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f_measure: Option<f64>,
    pub purity: Option<f64>,
    pub inverse_purity: Option<f64>,
    pub rand_index: Option<f64>,
    /// Traces actually scored.
    pub scored: usize,
}

fn defined(result: Result<f64, MetricsError>) -> Result<Option<f64>, MetricsError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(MetricsError::Undefined { metric }) => {
            debug!(metric, "metric undefined for this input");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Score `labels` against `truth` (same length, same order).
///
/// Outlier-marked positions are dropped from both sides before any pair
/// is counted.
pub fn evaluate<T>(labels: &LabelSequence, truth: &[T], beta: f64) -> Result<Scores, MetricsError>
where
    T: Eq + Hash,
{
    if labels.len() != truth.len() {
        return Err(MetricsError::LengthMismatch {
            predicted: labels.len(),
            truth: truth.len(),
        });
    }

    let (predicted, kept_truth): (Vec<usize>, Vec<&T>) = labels
        .iter()
        .zip(truth)
        .filter_map(|(label, t)| match label {
            ClusterLabel::Cluster(id) => Some((*id, t)),
            ClusterLabel::Outlier => None,
        })
        .unzip();

    let counts = confusion_counts(&predicted, &kept_truth)?;
    Ok(Scores {
        precision: defined(precision(&counts))?,
        recall: defined(recall(&counts))?,
        f_measure: defined(f_measure(&counts, beta))?,
        purity: defined(purity(&predicted, &kept_truth))?,
        inverse_purity: defined(inverse_purity(&predicted, &kept_truth))?,
        rand_index: defined(rand_index(&counts))?,
        scored: predicted.len(),
    })
}
