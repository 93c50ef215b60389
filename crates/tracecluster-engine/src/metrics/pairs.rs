//! Pair-counting metrics.
//!
//! Every unordered pair `(i, j)`, `i < j`, is one decision: same or
//! different predicted cluster against same or different ground-truth class.

use tracecluster_core::errors::MetricsError;
use tracecluster_core::types::ConfusionCounts;

/// Classify every unordered pair into TP / TN / FP / FN.
///
/// Rejects sequences of unequal length before counting anything.
pub fn confusion_counts<R: PartialEq, T: PartialEq>(
    predicted: &[R],
    truth: &[T],
) -> Result<ConfusionCounts, MetricsError> {
    if predicted.len() != truth.len() {
        return Err(MetricsError::LengthMismatch {
            predicted: predicted.len(),
            truth: truth.len(),
        });
    }

    let mut counts = ConfusionCounts::default();
    let n = predicted.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let same_cluster = predicted[i] == predicted[j];
            let same_class = truth[i] == truth[j];
            match (same_cluster, same_class) {
                (true, true) => counts.true_positive += 1,
                (true, false) => counts.false_positive += 1,
                (false, true) => counts.false_negative += 1,
                (false, false) => counts.true_negative += 1,
            }
        }
    }
    Ok(counts)
}

fn ratio(numerator: u64, denominator: u64, metric: &'static str) -> Result<f64, MetricsError> {
    if denominator == 0 {
        return Err(MetricsError::Undefined { metric });
    }
    Ok(numerator as f64 / denominator as f64)
}

/// TP / (TP + FP)
pub fn precision(c: &ConfusionCounts) -> Result<f64, MetricsError> {
    ratio(c.true_positive, c.true_positive + c.false_positive, "Precision")
}

/// TP / (TP + FN)
pub fn recall(c: &ConfusionCounts) -> Result<f64, MetricsError> {
    ratio(c.true_positive, c.true_positive + c.false_negative, "Recall")
}

/// (TP + TN) / (TP + TN + FP + FN)
pub fn rand_index(c: &ConfusionCounts) -> Result<f64, MetricsError> {
    ratio(c.true_positive + c.true_negative, c.total(), "Rand Index")
}

/// `(1 + β²)·P·R / (R + β²·P)`. β > 1 weights recall more heavily.
pub fn f_measure(c: &ConfusionCounts, beta: f64) -> Result<f64, MetricsError> {
    let p = precision(c)?;
    let r = recall(c)?;
    let b2 = beta * beta;
    let denominator = r + b2 * p;
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(MetricsError::Undefined { metric: "F-measure" });
    }
    Ok((1.0 + b2) * p * r / denominator)
}
