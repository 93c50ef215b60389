//! Purity and inverse purity.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracecluster_core::errors::MetricsError;

/// `(1/N) · Σ_clusters max_class |cluster ∩ class|`.
pub fn purity<R, T>(predicted: &[R], truth: &[T]) -> Result<f64, MetricsError>
where
    R: Eq + Hash,
    T: Eq + Hash,
{
    if predicted.len() != truth.len() {
        return Err(MetricsError::LengthMismatch {
            predicted: predicted.len(),
            truth: truth.len(),
        });
    }
    if predicted.is_empty() {
        return Err(MetricsError::Undefined { metric: "Purity" });
    }

    let mut overlap: FxHashMap<&R, FxHashMap<&T, usize>> = FxHashMap::default();
    for (p, t) in predicted.iter().zip(truth) {
        *overlap.entry(p).or_default().entry(t).or_insert(0) += 1;
    }

    let majority: usize = overlap
        .values()
        .map(|classes| classes.values().copied().max().unwrap_or(0))
        .sum();
    Ok(majority as f64 / predicted.len() as f64)
}

/// Purity with the roles swapped: each class credited with its best cluster.
pub fn inverse_purity<R, T>(predicted: &[R], truth: &[T]) -> Result<f64, MetricsError>
where
    R: Eq + Hash,
    T: Eq + Hash,
{
    purity(truth, predicted).map_err(|e| match e {
        MetricsError::LengthMismatch { predicted, truth } => MetricsError::LengthMismatch {
            predicted: truth,
            truth: predicted,
        },
        MetricsError::Undefined { .. } => MetricsError::Undefined {
            metric: "Inverse Purity",
        },
        other => other,
    })
}
