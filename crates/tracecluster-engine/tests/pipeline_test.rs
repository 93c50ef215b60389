//! End-to-end clustering runs with scripted collaborators and real traces.

use std::fs;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tracecluster_core::config::TraceClusterConfig;
use tracecluster_core::errors::{PipelineError, PipelineStage, ProviderError, TraceError};
use tracecluster_core::traits::{AnomalyDetector, GraphBuilder, Partitioner, SimilarityProvider};
use tracecluster_core::types::{
    AnomalyFlag, ClusterLabel, DistanceMatrix, SimilarityMatrix, SquareMatrix, Trace,
};
use tracecluster_engine::ClusterPipeline;

// ---- scripted collaborators ----

/// The "graph" of a trace is its position.
struct PositionBuilder;

impl GraphBuilder<usize> for PositionBuilder {
    fn build(&self, trace: &Trace) -> Result<usize, TraceError> {
        Ok(trace.position)
    }
}

/// Answers from a fixed full matrix and records every collection it saw.
struct FixedSimilarity {
    full: Vec<Vec<f64>>,
    calls: Arc<Mutex<Vec<Vec<usize>>>>,
    fail_on_call: Option<usize>,
}

impl FixedSimilarity {
    fn new(full: Vec<Vec<f64>>) -> (Self, Arc<Mutex<Vec<Vec<usize>>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                full,
                calls: Arc::clone(&calls),
                fail_on_call: None,
            },
            calls,
        )
    }
}

impl SimilarityProvider<usize> for FixedSimilarity {
    fn similarity(&self, graphs: &[usize]) -> Result<SimilarityMatrix, ProviderError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(graphs.to_vec());
        if self.fail_on_call == Some(calls.len()) {
            return Err(ProviderError::failed("fixed", "kernel exploded"));
        }
        let rows = graphs
            .iter()
            .map(|&i| graphs.iter().map(|&j| self.full[i][j]).collect())
            .collect();
        SimilarityMatrix::from_rows(rows).map_err(|m| ProviderError::invalid("fixed", m))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct FlagDetector(Vec<usize>);

impl AnomalyDetector for FlagDetector {
    fn flag(&self, d: &DistanceMatrix) -> Result<Vec<AnomalyFlag>, ProviderError> {
        Ok((0..d.size())
            .map(|i| {
                if self.0.contains(&i) {
                    AnomalyFlag::Outlier
                } else {
                    AnomalyFlag::Normal
                }
            })
            .collect())
    }

    fn name(&self) -> &str {
        "flags"
    }
}

struct FailingDetector;

impl AnomalyDetector for FailingDetector {
    fn flag(&self, _d: &DistanceMatrix) -> Result<Vec<AnomalyFlag>, ProviderError> {
        Err(ProviderError::failed("failing", "no model"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

struct FailingPartitioner;

impl Partitioner for FailingPartitioner {
    fn partition(&self, _m: &SimilarityMatrix, _k: usize) -> Result<Vec<usize>, ProviderError> {
        Err(ProviderError::failed("failing", "did not converge"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

// ---- fixtures ----

fn traces(n: usize) -> Vec<Trace> {
    (0..n).map(|i| Trace::new(i, format!("/traces/t{i}"))).collect()
}

fn constant(n: usize, value: f64) -> Vec<Vec<f64>> {
    let m = SquareMatrix::filled(n, value, 1.0);
    m.rows().map(<[f64]>::to_vec).collect()
}

/// Block structure: traces sharing `group[i]` are similar.
fn blocks(group: &[usize]) -> Vec<Vec<f64>> {
    group
        .iter()
        .enumerate()
        .map(|(i, gi)| {
            group
                .iter()
                .enumerate()
                .map(|(j, gj)| match (i == j, gi == gj) {
                    (true, _) => 1.0,
                    (false, true) => 0.9,
                    (false, false) => 0.1,
                })
                .collect()
        })
        .collect()
}

fn pipeline(sim: FixedSimilarity) -> ClusterPipeline<usize> {
    ClusterPipeline::new(Box::new(PositionBuilder), Box::new(sim))
}

// ---- scenarios ----

#[test]
fn near_identical_traces_form_one_cluster() {
    let (sim, _) = FixedSimilarity::new(constant(6, 0.9));
    let run = pipeline(sim)
        .with_outlier_ratio(0.0)
        .with_max_cluster(16)
        .run(&traces(6))
        .unwrap();

    assert!(run.is_single_cluster());
    assert_eq!(run.selection.score, 0.0);
    assert_eq!(run.labels.len(), 6);
    assert!(run.labels.iter().all(|l| *l == ClusterLabel::Cluster(0)));
}

#[test]
fn block_structure_is_recovered() {
    let group = [0, 0, 1, 1, 0, 1];
    let (sim, calls) = FixedSimilarity::new(blocks(&group));
    let run = pipeline(sim).run(&traces(6)).unwrap();

    assert!(!run.is_single_cluster());
    assert_eq!(run.selection.k, 2);
    let l = run.labels.as_slice();
    assert_eq!(l[0], l[1]);
    assert_eq!(l[0], l[4]);
    assert_eq!(l[2], l[3]);
    assert_eq!(l[2], l[5]);
    assert_ne!(l[0], l[2]);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn outliers_trigger_rebuild_over_kept_traces() {
    let group = [0, 0, 9, 1, 1, 0, 1];
    let (sim, calls) = FixedSimilarity::new(blocks(&group));
    let run = pipeline(sim)
        .with_outlier_ratio(0.5)
        .with_detector(Box::new(FlagDetector(vec![2])))
        .run(&traces(7))
        .unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], vec![0, 1, 3, 4, 5, 6]);

    assert_eq!(run.labels.get(2), Some(ClusterLabel::Outlier));
    assert_eq!(run.labels.outlier_count(), 1);
    assert_eq!(run.selection.labels.len(), 6);
    let kept: Vec<ClusterLabel> = run
        .labels
        .iter()
        .copied()
        .filter(|l| !l.is_outlier())
        .collect();
    let expected: Vec<ClusterLabel> =
        run.selection.labels.iter().map(|&c| ClusterLabel::Cluster(c)).collect();
    assert_eq!(kept, expected);
}

#[test]
fn over_triggering_detector_is_ignored() {
    // floor(6 * 0.5) = 3 flags: at the limit, so every trace is clustered.
    let (sim, calls) = FixedSimilarity::new(blocks(&[0, 0, 0, 1, 1, 1]));
    let run = pipeline(sim)
        .with_outlier_ratio(0.5)
        .with_detector(Box::new(FlagDetector(vec![0, 2, 4])))
        .run(&traces(6))
        .unwrap();

    assert!(!run.mask.has_outliers());
    assert_eq!(run.labels.outlier_count(), 0);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn bad_configuration_fails_before_any_work() {
    let cases: [(f64, usize, usize, &str); 3] = [
        (1.5, 16, 6, "outlier_ratio"),
        (0.0, 1, 6, "max_cluster"),
        (0.0, 16, 2, "traces"),
    ];
    for (ratio, max_cluster, n, field_name) in cases {
        let (sim, calls) = FixedSimilarity::new(constant(6, 0.5));
        let err = pipeline(sim)
            .with_outlier_ratio(ratio)
            .with_max_cluster(max_cluster)
            .run(&traces(n))
            .unwrap_err();
        match err {
            PipelineError::Config(e) => assert!(e.to_string().contains(field_name)),
            other => panic!("expected config error, got {other}"),
        }
        assert!(calls.lock().unwrap().is_empty());
    }
}

#[test]
fn collaborator_failures_name_their_stage() {
    let (mut sim, _) = FixedSimilarity::new(constant(5, 0.5));
    sim.fail_on_call = Some(1);
    let err = pipeline(sim).run(&traces(5)).unwrap_err();
    assert_eq!(err.failed_stage(), Some(PipelineStage::Similarity));

    let (sim, _) = FixedSimilarity::new(constant(5, 0.5));
    let err = pipeline(sim)
        .with_outlier_ratio(0.5)
        .with_detector(Box::new(FailingDetector))
        .run(&traces(5))
        .unwrap_err();
    assert_eq!(err.failed_stage(), Some(PipelineStage::OutlierDetection));

    let (mut sim, _) = FixedSimilarity::new(constant(5, 0.5));
    sim.fail_on_call = Some(2);
    let err = pipeline(sim)
        .with_outlier_ratio(0.5)
        .with_detector(Box::new(FlagDetector(vec![1])))
        .run(&traces(5))
        .unwrap_err();
    assert_eq!(err.failed_stage(), Some(PipelineStage::SimilarityRebuild));

    let (sim, _) = FixedSimilarity::new(constant(5, 0.5));
    let err = pipeline(sim)
        .with_partitioner(Box::new(FailingPartitioner))
        .run(&traces(5))
        .unwrap_err();
    assert_eq!(err.failed_stage(), Some(PipelineStage::Partitioning));
}

#[test]
fn runs_do_not_share_state() {
    let (sim, _) = FixedSimilarity::new(blocks(&[0, 0, 0, 1, 1, 1]));
    let p = pipeline(sim);
    let first = p.run(&traces(6)).unwrap();
    let second = p.run(&traces(6)).unwrap();
    assert_eq!(first.labels, second.labels);
    assert_eq!(first.selection, second.selection);
}

#[test]
fn clusters_real_trace_files() {
    let dir = TempDir::new().unwrap();
    let mut paths = Vec::new();
    for family in 0..2u64 {
        for variant in 0..3u64 {
            let base = 0x40_0000 + family * 0x1_0000;
            let mut lines: Vec<String> = (0..20).map(|a| format!("{:#x}", base + a * 4)).collect();
            lines.push(format!("{:#x}", base + 0x800 + variant));
            let path = dir.path().join(format!("f{family}_v{variant}"));
            fs::write(&path, lines.join("\n")).unwrap();
            paths.push(path);
        }
    }

    let config = TraceClusterConfig::default();
    let run = ClusterPipeline::from_config(&config)
        .run(&Trace::sequence(&paths))
        .unwrap();

    let l = run.labels.as_slice();
    assert_eq!(l[0], l[1]);
    assert_eq!(l[1], l[2]);
    assert_eq!(l[3], l[4]);
    assert_eq!(l[4], l[5]);
    assert_ne!(l[0], l[3]);
}

#[test]
fn unreadable_trace_is_a_trace_error() {
    let dir = TempDir::new().unwrap();
    let ok = dir.path().join("ok");
    fs::write(&ok, "0x1\n0x2\n").unwrap();
    let paths = vec![ok.clone(), ok, dir.path().join("missing")];

    let err = ClusterPipeline::from_config(&TraceClusterConfig::default())
        .run(&Trace::sequence(&paths))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Trace(TraceError::Io { .. })));
}
