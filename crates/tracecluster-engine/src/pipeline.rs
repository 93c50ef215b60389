//! Clustering run orchestrator.
//!
//! build graphs → similarity → outlier filter → (if any outliers) rebuild
//! similarity over the kept graphs → cluster-count selection → reconcile.

use std::time::Instant;

use tracecluster_core::config::TraceClusterConfig;
use tracecluster_core::constants::{DEFAULT_MAX_CLUSTER, DEFAULT_OUTLIER_RATIO, MIN_TRACE_COUNT};
use tracecluster_core::errors::{ConfigError, PipelineError, PipelineStage, ProviderError};
use tracecluster_core::traits::{
    AnomalyDetector, GraphBuilder, Partitioner, QualityScorer, SimilarityProvider,
};
use tracecluster_core::tracing::metrics;
use tracecluster_core::types::{LabelSequence, OutlierMask, SimilarityMatrix, Trace};
use tracecluster_graph::{Dcfg, DcfgBuilder, HitHistogramSimilarity};
use tracing::{field, info, info_span};

use crate::outlier_filter::OutlierFilter;
use crate::primitives::{KMedoids, Silhouette, ZScoreDetector};
use crate::reconciler::reconcile;
use crate::selector::{ClusterSelector, Selection};

/// Result of one clustering run.
#[derive(Debug, Clone)]
pub struct ClusterRun {
    /// One label per input trace, in input order.
    pub labels: LabelSequence,
    pub mask: OutlierMask,
    /// Selector outcome over the kept traces.
    pub selection: Selection,
}

impl ClusterRun {
    /// Every kept trace landed in one cluster because no cluster count beat
    /// the single-cluster baseline.
    pub fn is_single_cluster(&self) -> bool {
        self.selection.degenerate
    }
}

/// Owns the collaborators of a clustering run. Each `run` is independent;
/// no state is carried between runs.
pub struct ClusterPipeline<G> {
    builder: Box<dyn GraphBuilder<G>>,
    similarity: Box<dyn SimilarityProvider<G>>,
    partitioner: Box<dyn Partitioner>,
    scorer: Box<dyn QualityScorer>,
    detector: Box<dyn AnomalyDetector>,
    outlier_ratio: f64,
    max_cluster: usize,
}

impl ClusterPipeline<Dcfg> {
    /// DCFG builder and histogram similarity configured from `config`,
    /// with the default partitioner, scorer and detector.
    pub fn from_config(config: &TraceClusterConfig) -> Self {
        Self::new(
            Box::new(DcfgBuilder::new()),
            Box::new(HitHistogramSimilarity::from_config(&config.similarity)),
        )
        .with_outlier_ratio(config.clustering.effective_outlier_ratio())
        .with_max_cluster(config.clustering.effective_max_cluster())
    }
}

impl<G> ClusterPipeline<G> {
    pub fn new(
        builder: Box<dyn GraphBuilder<G>>,
        similarity: Box<dyn SimilarityProvider<G>>,
    ) -> Self {
        Self {
            builder,
            similarity,
            partitioner: Box::new(KMedoids::default()),
            scorer: Box::new(Silhouette),
            detector: Box::new(ZScoreDetector::default()),
            outlier_ratio: DEFAULT_OUTLIER_RATIO,
            max_cluster: DEFAULT_MAX_CLUSTER,
        }
    }

    pub fn with_partitioner(mut self, partitioner: Box<dyn Partitioner>) -> Self {
        self.partitioner = partitioner;
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn QualityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_detector(mut self, detector: Box<dyn AnomalyDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_outlier_ratio(mut self, ratio: f64) -> Self {
        self.outlier_ratio = ratio;
        self
    }

    pub fn with_max_cluster(mut self, max_cluster: usize) -> Self {
        self.max_cluster = max_cluster;
        self
    }

    pub fn outlier_ratio(&self) -> f64 {
        self.outlier_ratio
    }

    pub fn max_cluster(&self) -> usize {
        self.max_cluster
    }

    /// Cluster `traces`; the returned labels follow their order.
    pub fn run(&self, traces: &[Trace]) -> Result<ClusterRun, PipelineError> {
        let (filter, selector) = self.validate(traces.len())?;

        let span = info_span!(
            "cluster_run",
            trace_count = traces.len(),
            outlier_count = field::Empty,
            k = field::Empty,
            score = field::Empty,
            similarity_build_time = field::Empty,
            selection_time = field::Empty,
        );
        let _guard = span.enter();

        info!(traces = traces.len(), "building graphs");
        let graphs = traces
            .iter()
            .map(|t| self.builder.build(t))
            .collect::<Result<Vec<G>, _>>()?;

        info!("building similarity matrix");
        let started = Instant::now();
        let matrix = self.similarity_for(&graphs, PipelineStage::Similarity)?;
        span.record(metrics::SIMILARITY_BUILD_TIME, started.elapsed().as_millis() as u64);

        info!(ratio = filter.ratio(), "checking outliers");
        let mask = filter
            .filter(&matrix, self.detector.as_ref())
            .map_err(|e| PipelineError::stage(PipelineStage::OutlierDetection, e))?;
        span.record(metrics::OUTLIER_COUNT, mask.outlier_count() as u64);

        let matrix = if mask.has_outliers() {
            info!(
                outliers = mask.outlier_count(),
                "rebuilding similarity matrix without outliers"
            );
            let kept: Vec<G> = graphs
                .into_iter()
                .zip(mask.as_slice())
                .filter(|&(_, &excluded)| !excluded)
                .map(|(g, _)| g)
                .collect();
            self.similarity_for(&kept, PipelineStage::SimilarityRebuild)?
        } else {
            info!("no outliers found");
            matrix
        };

        info!(traces = matrix.size(), max_cluster = self.max_cluster, "clustering");
        let started = Instant::now();
        let selection = selector.select(&matrix)?;
        span.record(metrics::SELECTION_TIME, started.elapsed().as_millis() as u64);
        span.record(metrics::CLUSTER_COUNT, selection.k as u64);
        span.record(metrics::QUALITY_SCORE, selection.score);

        info!("reconciling labels");
        let labels = reconcile(&mask, &selection.labels)
            .map_err(|e| PipelineError::stage(PipelineStage::Partitioning, e))?;

        info!(
            clusters = labels.cluster_count(),
            outliers = labels.outlier_count(),
            single_cluster = selection.degenerate,
            "clustering run complete"
        );
        Ok(ClusterRun {
            labels,
            mask,
            selection,
        })
    }

    fn validate(
        &self,
        trace_count: usize,
    ) -> Result<(OutlierFilter, ClusterSelector<'_>), ConfigError> {
        let filter = OutlierFilter::new(self.outlier_ratio)?;
        let selector = ClusterSelector::new(
            self.partitioner.as_ref(),
            self.scorer.as_ref(),
            self.max_cluster,
        )?;
        if trace_count < MIN_TRACE_COUNT {
            return Err(ConfigError::invalid(
                "traces",
                format!("need at least {MIN_TRACE_COUNT} traces, got {trace_count}"),
            ));
        }
        Ok((filter, selector))
    }

    fn similarity_for(
        &self,
        graphs: &[G],
        stage: PipelineStage,
    ) -> Result<SimilarityMatrix, PipelineError> {
        let matrix = self
            .similarity
            .similarity(graphs)
            .map_err(|e| PipelineError::stage(stage, e))?;
        if matrix.size() != graphs.len() {
            return Err(PipelineError::stage(
                stage,
                ProviderError::shape(self.similarity.name(), graphs.len(), matrix.size()),
            ));
        }
        Ok(matrix)
    }
}
