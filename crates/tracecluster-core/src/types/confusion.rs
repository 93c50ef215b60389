//! Pairwise decision counts for external cluster evaluation.

use serde::{Deserialize, Serialize};

/// TP/TN/FP/FN over all unordered trace pairs.
///
/// `total()` equals N·(N−1)/2 for the N traces that were scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionCounts {
    /// Same cluster, same class.
    pub true_positive: u64,
    /// Different cluster, different class.
    pub true_negative: u64,
    /// Same cluster, different class.
    pub false_positive: u64,
    /// Different cluster, same class.
    pub false_negative: u64,
}

impl ConfusionCounts {
    pub fn total(&self) -> u64 {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    /// Number of unordered pairs among `n` items.
    pub fn expected_pairs(n: usize) -> u64 {
        let n = n as u64;
        n * n.saturating_sub(1) / 2
    }
}
