//! Adaptive model-order search with early stopping.
//!
//! Tries `k = 2, 3, …` against a virtual single-cluster baseline scored 0,
//! keeps the strictly best internal quality score, and stops after two
//! consecutive score drops. The first drop away from the zero baseline is
//! not counted until some round has scored away from 0.

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracecluster_core::constants::{
    MAX_CONSECUTIVE_DECREASES, MIN_CLUSTER_BOUND, SINGLE_CLUSTER_SCORE,
};
use tracecluster_core::errors::{ConfigError, PipelineError, PipelineStage, ProviderError};
use tracecluster_core::traits::{Partitioner, QualityScorer};
use tracecluster_core::types::{DistanceMatrix, SimilarityMatrix};
use tracing::{debug, info, warn};

/// One attempted cluster count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionRound {
    pub k: usize,
    pub score: f64,
    /// Consecutive-decrease counter after this round.
    pub decreases: u32,
}

/// Outcome of one selector invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// One label per input trace, in `[0, k - 1]`.
    pub labels: Vec<usize>,
    /// Internal quality score of the chosen partition.
    pub score: f64,
    /// Chosen cluster count; 1 when no round beat the baseline.
    pub k: usize,
    /// No `k >= 2` round improved on the single-cluster baseline.
    pub degenerate: bool,
    pub rounds: Vec<SelectionRound>,
}

/// Search state local to one [`ClusterSelector::select`] call.
struct SelectionState {
    best_score: f64,
    best_labels: Option<Vec<usize>>,
    best_k: usize,
    prev_score: f64,
    decreases: u32,
    baseline_only: bool,
}

impl SelectionState {
    fn new() -> Self {
        Self {
            best_score: SINGLE_CLUSTER_SCORE,
            best_labels: None,
            best_k: 1,
            prev_score: SINGLE_CLUSTER_SCORE,
            decreases: 0,
            baseline_only: true,
        }
    }

    /// Fold one round in. Returns `true` when the search should stop.
    fn observe(&mut self, k: usize, score: f64, labels: Vec<usize>) -> bool {
        if self.prev_score != SINGLE_CLUSTER_SCORE {
            self.baseline_only = false;
        }

        if score >= self.prev_score {
            self.decreases = 0;
        } else if !self.baseline_only {
            self.decreases += 1;
        }

        // Strict: ties keep the smaller k.
        if score > self.best_score {
            self.best_score = score;
            self.best_labels = Some(labels);
            self.best_k = k;
        }

        self.prev_score = score;
        self.decreases >= MAX_CONSECUTIVE_DECREASES
    }
}

/// Picks the best partition of a similarity matrix across cluster counts.
pub struct ClusterSelector<'a> {
    partitioner: &'a dyn Partitioner,
    scorer: &'a dyn QualityScorer,
    max_cluster: usize,
}

impl<'a> ClusterSelector<'a> {
    pub fn new(
        partitioner: &'a dyn Partitioner,
        scorer: &'a dyn QualityScorer,
        max_cluster: usize,
    ) -> Result<Self, ConfigError> {
        if max_cluster < MIN_CLUSTER_BOUND {
            return Err(ConfigError::invalid(
                "max_cluster",
                format!("must be at least {MIN_CLUSTER_BOUND}, got {max_cluster}"),
            ));
        }
        Ok(Self {
            partitioner,
            scorer,
            max_cluster,
        })
    }

    pub fn max_cluster(&self) -> usize {
        self.max_cluster
    }

    /// Run the search over `matrix` (already outlier-filtered).
    pub fn select(&self, matrix: &SimilarityMatrix) -> Result<Selection, PipelineError> {
        let n = matrix.size();
        let distance = matrix.dissimilarity();
        let upper = self.max_cluster.min(n.saturating_sub(1));

        let mut state = SelectionState::new();
        let mut rounds = Vec::new();

        for k in MIN_CLUSTER_BOUND..=upper {
            let labels = self.partition(matrix, k)?;
            let score = self.score(&distance, &labels)?;

            let stop = state.observe(k, score, labels);
            debug!(k, score, decreases = state.decreases, "selector round");
            rounds.push(SelectionRound {
                k,
                score,
                decreases: state.decreases,
            });
            if stop {
                debug!(k, "two consecutive decreases, stopping search");
                break;
            }
        }

        match state.best_labels {
            Some(labels) if state.best_score != SINGLE_CLUSTER_SCORE => {
                info!(k = state.best_k, score = state.best_score, "cluster count selected");
                Ok(Selection {
                    labels,
                    score: state.best_score,
                    k: state.best_k,
                    degenerate: false,
                    rounds,
                })
            }
            _ => {
                warn!(
                    traces = n,
                    attempts = rounds.len(),
                    "no cluster count beat the single-cluster baseline, returning one cluster"
                );
                Ok(Selection {
                    labels: vec![0; n],
                    score: SINGLE_CLUSTER_SCORE,
                    k: 1,
                    degenerate: true,
                    rounds,
                })
            }
        }
    }

    fn partition(&self, matrix: &SimilarityMatrix, k: usize) -> Result<Vec<usize>, PipelineError> {
        let stage = |e: ProviderError| PipelineError::stage(PipelineStage::Partitioning, e);
        let labels = self.partitioner.partition(matrix, k).map_err(stage)?;

        let name = self.partitioner.name();
        if labels.len() != matrix.size() {
            return Err(stage(ProviderError::shape(name, matrix.size(), labels.len())));
        }
        if let Some(bad) = labels.iter().find(|&&l| l >= k) {
            return Err(stage(ProviderError::invalid(
                name,
                format!("label {bad} outside [0, {}]", k - 1),
            )));
        }
        Ok(labels)
    }

    fn score(&self, distance: &DistanceMatrix, labels: &[usize]) -> Result<f64, PipelineError> {
        let distinct: FxHashSet<usize> = labels.iter().copied().collect();
        if distinct.len() < MIN_CLUSTER_BOUND {
            return Ok(SINGLE_CLUSTER_SCORE);
        }

        let stage = |e: ProviderError| PipelineError::stage(PipelineStage::QualityScoring, e);
        let score = self.scorer.score(distance, labels).map_err(stage)?;
        if !score.is_finite() {
            return Err(stage(ProviderError::invalid(
                self.scorer.name(),
                format!("non-finite score {score}"),
            )));
        }
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Partitions into `k` round-robin groups and replays a fixed score list.
    struct Scripted {
        scores: Mutex<Vec<f64>>,
    }

    impl Scripted {
        fn new(scores: &[f64]) -> Self {
            let mut scores = scores.to_vec();
            scores.reverse();
            Self {
                scores: Mutex::new(scores),
            }
        }
    }

    impl Partitioner for Scripted {
        fn partition(&self, m: &SimilarityMatrix, k: usize) -> Result<Vec<usize>, ProviderError> {
            Ok((0..m.size()).map(|i| i % k).collect())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    impl QualityScorer for Scripted {
        fn score(&self, _d: &DistanceMatrix, _l: &[usize]) -> Result<f64, ProviderError> {
            self.scores
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| ProviderError::failed("scripted", "script exhausted"))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn run(scores: &[f64], n: usize, max_cluster: usize) -> Selection {
        let s = Scripted::new(scores);
        let m = SimilarityMatrix::constant(n, 0.5).unwrap();
        ClusterSelector::new(&s, &s, max_cluster).unwrap().select(&m).unwrap()
    }

    #[test]
    fn picks_highest_score() {
        let sel = run(&[0.2, 0.5, 0.4, 0.3], 20, 5);
        assert_eq!(sel.k, 3);
        assert_eq!(sel.score, 0.5);
        assert!(!sel.degenerate);
        // 0.4 then 0.3: two drops, stop at k = 5
        assert_eq!(sel.rounds.len(), 4);
    }

    #[test]
    fn ties_keep_smaller_k() {
        let sel = run(&[0.4, 0.4, 0.4], 20, 4);
        assert_eq!(sel.k, 2);
    }

    #[test]
    fn first_drop_from_zero_baseline_is_exempt() {
        // 0 -> -0.1 (exempt) -> -0.2 (strike 1) -> 0.3 (reset) -> 0.2 -> 0.1 (stop)
        let sel = run(&[-0.1, -0.2, 0.3, 0.2, 0.1, 0.9], 20, 10);
        assert_eq!(sel.k, 4);
        assert_eq!(sel.score, 0.3);
        assert_eq!(sel.rounds.len(), 5);
        assert_eq!(sel.rounds[0].decreases, 0);
        assert_eq!(sel.rounds[1].decreases, 1);
    }

    #[test]
    fn all_negative_and_decreasing_is_degenerate() {
        let sel = run(&[-0.1, -0.2, -0.3], 8, 16);
        assert!(sel.degenerate);
        assert_eq!(sel.score, 0.0);
        assert_eq!(sel.k, 1);
        assert_eq!(sel.labels, vec![0; 8]);
        assert_eq!(sel.rounds.len(), 3);
    }

    #[test]
    fn bound_caps_rounds() {
        let sel = run(&[0.1, 0.2, 0.3], 20, 3);
        assert_eq!(sel.rounds.len(), 2);
        assert_eq!(sel.k, 3);
    }

    #[test]
    fn two_traces_have_no_candidate_rounds() {
        let sel = run(&[], 2, 16);
        assert!(sel.degenerate);
        assert_eq!(sel.labels, vec![0, 0]);
    }

    #[test]
    fn max_cluster_below_two_is_rejected() {
        let s = Scripted::new(&[]);
        assert!(ClusterSelector::new(&s, &s, 1).is_err());
    }

    #[test]
    fn out_of_range_label_fails_partitioning_stage() {
        struct Bad;
        impl Partitioner for Bad {
            fn partition(&self, m: &SimilarityMatrix, k: usize) -> Result<Vec<usize>, ProviderError> {
                Ok(vec![k; m.size()])
            }
            fn name(&self) -> &str {
                "bad"
            }
        }
        let s = Scripted::new(&[0.5]);
        let m = SimilarityMatrix::constant(4, 0.5).unwrap();
        let err = ClusterSelector::new(&Bad, &s, 4).unwrap().select(&m).unwrap_err();
        assert_eq!(err.failed_stage(), Some(PipelineStage::Partitioning));
    }

    #[test]
    fn scorer_failure_names_scoring_stage() {
        let s = Scripted::new(&[]);
        let m = SimilarityMatrix::constant(4, 0.5).unwrap();
        let err = ClusterSelector::new(&s, &s, 4).unwrap().select(&m).unwrap_err();
        assert_eq!(err.failed_stage(), Some(PipelineStage::QualityScoring));
    }
}
