//! Mean silhouette over a precomputed distance matrix.
//!
//! s(i) = (b(i) − a(i)) / max(a(i), b(i)), where a(i) is the mean distance to
//! the rest of i's cluster and b(i) the smallest mean distance to another
//! cluster. Singleton clusters score 0.

use rustc_hash::FxHashMap;
use tracecluster_core::errors::ProviderError;
use tracecluster_core::traits::QualityScorer;
use tracecluster_core::types::DistanceMatrix;

const NAME: &str = "silhouette";

/// Sample values closer to zero than this are reported as exactly zero.
const ZERO_SNAP: f64 = 1e-12;

#[derive(Debug, Clone, Copy, Default)]
pub struct Silhouette;

impl Silhouette {
    fn sample(
        distance: &DistanceMatrix,
        labels: &[usize],
        sizes: &FxHashMap<usize, usize>,
        i: usize,
    ) -> f64 {
        let own = labels[i];
        if sizes.get(&own).copied().unwrap_or(0) <= 1 {
            return 0.0;
        }

        let mut sums: FxHashMap<usize, f64> = FxHashMap::default();
        for (j, &label) in labels.iter().enumerate() {
            if j != i {
                *sums.entry(label).or_insert(0.0) += distance.get(i, j);
            }
        }

        let a = sums.get(&own).copied().unwrap_or(0.0) / (sizes[&own] - 1) as f64;
        let b = sums
            .iter()
            .filter(|&(&label, _)| label != own)
            .map(|(label, &sum)| sum / sizes[label] as f64)
            .fold(f64::INFINITY, f64::min);

        let max_ab = a.max(b);
        if !b.is_finite() || max_ab <= 0.0 {
            return 0.0;
        }
        let s = (b - a) / max_ab;
        if s.abs() < ZERO_SNAP {
            0.0
        } else {
            s
        }
    }
}

impl QualityScorer for Silhouette {
    fn score(&self, distance: &DistanceMatrix, labels: &[usize]) -> Result<f64, ProviderError> {
        let n = distance.size();
        if labels.len() != n {
            return Err(ProviderError::shape(NAME, n, labels.len()));
        }

        let mut sizes: FxHashMap<usize, usize> = FxHashMap::default();
        for &label in labels {
            *sizes.entry(label).or_insert(0) += 1;
        }
        if sizes.len() < 2 || sizes.len() > n.saturating_sub(1) {
            return Err(ProviderError::undefined(
                NAME,
                format!("{} distinct labels for {n} samples", sizes.len()),
            ));
        }

        let total: f64 = (0..n).map(|i| Self::sample(distance, labels, &sizes, i)).sum();
        Ok(total / n as f64)
    }

    fn name(&self) -> &str {
        NAME
    }
}
