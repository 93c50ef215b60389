//! Adaptive outlier removal with an over-triggering safety override.

use tracecluster_core::errors::{ConfigError, ProviderError};
use tracecluster_core::traits::AnomalyDetector;
use tracecluster_core::types::{OutlierMask, SimilarityMatrix};
use tracing::{debug, info};

/// Produces an [`OutlierMask`] over a similarity matrix.
///
/// A ratio of 0 disables detection entirely. Otherwise the detector's
/// flags are kept only when they mark fewer than `floor(N · ratio)`
/// traces; at or above that count every trace is clustered.
#[derive(Debug, Clone, Copy)]
pub struct OutlierFilter {
    ratio: f64,
}

impl OutlierFilter {
    pub fn new(ratio: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::invalid(
                "outlier_ratio",
                format!("must be within [0, 1], got {ratio}"),
            ));
        }
        Ok(Self { ratio })
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// `true` when the filter never calls the detector.
    pub fn is_disabled(&self) -> bool {
        self.ratio == 0.0
    }

    pub fn filter(
        &self,
        matrix: &SimilarityMatrix,
        detector: &dyn AnomalyDetector,
    ) -> Result<OutlierMask, ProviderError> {
        let n = matrix.size();
        if self.is_disabled() {
            return Ok(OutlierMask::clear(n));
        }

        let distance = matrix.dissimilarity();
        let flags = detector.flag(&distance)?;
        if flags.len() != n {
            return Err(ProviderError::shape(detector.name(), n, flags.len()));
        }

        let mask = OutlierMask::from_flags(&flags);
        let flagged = mask.outlier_count();
        let limit = (n as f64 * self.ratio).floor() as usize;

        if flagged >= limit {
            info!(
                flagged,
                limit,
                ratio = self.ratio,
                "detector flagged too many traces, clustering all"
            );
            return Ok(OutlierMask::clear(n));
        }

        debug!(flagged, limit, "outlier flags accepted");
        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tracecluster_core::types::{AnomalyFlag, DistanceMatrix};

    use super::*;

    struct Scripted {
        flags: Vec<AnomalyFlag>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn outliers(n: usize, at: &[usize]) -> Self {
            let flags = (0..n)
                .map(|i| {
                    if at.contains(&i) {
                        AnomalyFlag::Outlier
                    } else {
                        AnomalyFlag::Normal
                    }
                })
                .collect();
            Self {
                flags,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl AnomalyDetector for Scripted {
        fn flag(&self, _distance: &DistanceMatrix) -> Result<Vec<AnomalyFlag>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.flags.clone())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn matrix(n: usize) -> SimilarityMatrix {
        SimilarityMatrix::constant(n, 0.5).unwrap()
    }

    #[test]
    fn zero_ratio_never_calls_detector() {
        let detector = Scripted::outliers(4, &[1]);
        let mask = OutlierFilter::new(0.0).unwrap().filter(&matrix(4), &detector).unwrap();
        assert!(!mask.has_outliers());
        assert_eq!(mask.len(), 4);
        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn flags_below_limit_are_kept() {
        // floor(10 * 0.3) = 3, two flags < 3
        let detector = Scripted::outliers(10, &[2, 7]);
        let mask = OutlierFilter::new(0.3).unwrap().filter(&matrix(10), &detector).unwrap();
        assert_eq!(mask.outlier_indices(), vec![2, 7]);
    }

    #[test]
    fn flags_at_limit_are_discarded() {
        // floor(10 * 0.25) = 2, two flags >= 2
        let detector = Scripted::outliers(10, &[2, 7]);
        let mask = OutlierFilter::new(0.25).unwrap().filter(&matrix(10), &detector).unwrap();
        assert!(!mask.has_outliers());
    }

    #[test]
    fn floor_not_round() {
        // 5 * 0.39 = 1.95 floors to 1; one flag is already at the limit
        let detector = Scripted::outliers(5, &[0]);
        let mask = OutlierFilter::new(0.39).unwrap().filter(&matrix(5), &detector).unwrap();
        assert!(!mask.has_outliers());
    }

    #[test]
    fn wrong_length_is_a_shape_error() {
        let detector = Scripted::outliers(3, &[0]);
        let err = OutlierFilter::new(0.5).unwrap().filter(&matrix(4), &detector).unwrap_err();
        assert!(matches!(err, ProviderError::ShapeMismatch { expected: 4, actual: 3, .. }));
    }

    #[test]
    fn ratio_out_of_range_is_rejected() {
        assert!(OutlierFilter::new(-0.1).is_err());
        assert!(OutlierFilter::new(1.5).is_err());
        assert!(OutlierFilter::new(f64::NAN).is_err());
        assert!(OutlierFilter::new(1.0).is_ok());
    }
}
