//! Z-score anomaly detection over per-trace mean dissimilarity.
//!
//! Each trace is summarised by its mean distance to every other trace.
//! Iterative masking keeps one extreme trace from hiding others by
//! inflating the standard deviation. Only the far side is flagged: a trace
//! unusually close to everything else is central, not anomalous.

use statrs::statistics::Statistics;
use tracecluster_core::errors::ProviderError;
use tracecluster_core::traits::AnomalyDetector;
use tracecluster_core::types::{AnomalyFlag, DistanceMatrix};
use tracing::debug;

const NAME: &str = "zscore";

#[derive(Debug, Clone, Copy)]
pub struct ZScoreDetector {
    threshold: f64,
    max_iterations: usize,
}

impl Default for ZScoreDetector {
    fn default() -> Self {
        Self {
            threshold: 2.5,
            max_iterations: 3,
        }
    }
}

impl ZScoreDetector {
    pub fn new(threshold: f64, max_iterations: usize) -> Self {
        Self {
            threshold,
            max_iterations,
        }
    }

    /// Mean off-diagonal distance of each row.
    fn row_means(distance: &DistanceMatrix) -> Vec<f64> {
        let n = distance.size();
        (0..n)
            .map(|i| {
                if n < 2 {
                    return 0.0;
                }
                let sum: f64 = distance
                    .row(i)
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, &d)| d)
                    .sum();
                sum / (n - 1) as f64
            })
            .collect()
    }
}

impl AnomalyDetector for ZScoreDetector {
    fn flag(&self, distance: &DistanceMatrix) -> Result<Vec<AnomalyFlag>, ProviderError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ProviderError::failed(
                NAME,
                format!("threshold must be positive, got {}", self.threshold),
            ));
        }

        let values = Self::row_means(distance);
        let mut masked = vec![false; values.len()];

        for iteration in 0..self.max_iterations {
            let active: Vec<f64> = values
                .iter()
                .zip(&masked)
                .filter(|&(_, &m)| !m)
                .map(|(&v, _)| v)
                .collect();
            if active.len() < 2 {
                break;
            }

            let mean = active.iter().mean();
            let std_dev = active.iter().std_dev();
            if !std_dev.is_finite() || std_dev <= f64::EPSILON {
                break;
            }

            let mut found_new = false;
            for (i, &v) in values.iter().enumerate() {
                if !masked[i] && (v - mean) / std_dev > self.threshold {
                    masked[i] = true;
                    found_new = true;
                }
            }
            debug!(iteration, mean, std_dev, "zscore masking pass");

            if !found_new {
                break;
            }
        }

        Ok(masked
            .into_iter()
            .map(|m| if m { AnomalyFlag::Outlier } else { AnomalyFlag::Normal })
            .collect())
    }

    fn name(&self) -> &str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use tracecluster_core::types::SimilarityMatrix;

    use super::*;

    /// `n` near-identical traces plus the given far ones.
    fn with_far(n: usize, far: &[usize]) -> DistanceMatrix {
        let rows = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            1.0
                        } else if far.contains(&i) || far.contains(&j) {
                            0.05
                        } else {
                            0.95 - 0.001 * ((i + j) % 3) as f64
                        }
                    })
                    .collect()
            })
            .collect();
        SimilarityMatrix::from_rows(rows).unwrap().dissimilarity()
    }

    #[test]
    fn flags_the_far_trace() {
        let flags = ZScoreDetector::default().flag(&with_far(30, &[7])).unwrap();
        assert_eq!(flags.len(), 30);
        assert!(flags[7].is_outlier());
        assert_eq!(flags.iter().filter(|f| f.is_outlier()).count(), 1);
    }

    #[test]
    fn uniform_matrix_has_no_outliers() {
        let d = SimilarityMatrix::constant(10, 0.8).unwrap().dissimilarity();
        let flags = ZScoreDetector::default().flag(&d).unwrap();
        assert!(flags.iter().all(|f| !f.is_outlier()));
    }

    #[test]
    fn masking_finds_several() {
        let flags = ZScoreDetector::default().flag(&with_far(40, &[0, 1])).unwrap();
        assert!(flags[0].is_outlier());
        assert!(flags[1].is_outlier());
    }

    #[test]
    fn rejects_bad_threshold() {
        let d = SimilarityMatrix::constant(4, 0.8).unwrap().dissimilarity();
        assert!(ZScoreDetector::new(0.0, 3).flag(&d).is_err());
    }
}
