//! Normalised histogram kernel over DCFG labels.
//!
//! Each graph becomes a sparse feature vector keyed by node address and,
//! optionally, by transition pair. `K(a,b) = <φa,φb> / sqrt(<φa,φa><φb,φb>)`.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracecluster_core::config::{SimilarityConfig, Weighting};
use tracecluster_core::errors::ProviderError;
use tracecluster_core::traits::SimilarityProvider;
use tracecluster_core::types::{SimilarityMatrix, SquareMatrix};
use tracing::debug;

use crate::dcfg::Dcfg;

const PROVIDER: &str = "hit-histogram";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Feature {
    Node(u64),
    Edge(u64, u64),
}

/// Sparse feature vector with its precomputed squared norm.
struct Histogram {
    weights: FxHashMap<Feature, f64>,
    norm_sq: f64,
}

impl Histogram {
    fn dot(&self, other: &Histogram) -> f64 {
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .filter_map(|(f, w)| large.weights.get(f).map(|v| w * v))
            .sum()
    }
}

/// Default [`SimilarityProvider`] for DCFGs.
#[derive(Debug, Clone, Copy)]
pub struct HitHistogramSimilarity {
    weighting: Weighting,
    include_edges: bool,
}

impl Default for HitHistogramSimilarity {
    fn default() -> Self {
        Self {
            weighting: Weighting::Presence,
            include_edges: true,
        }
    }
}

impl HitHistogramSimilarity {
    pub fn new(weighting: Weighting, include_edges: bool) -> Self {
        Self {
            weighting,
            include_edges,
        }
    }

    pub fn from_config(config: &SimilarityConfig) -> Self {
        Self::new(config.effective_weighting(), config.effective_include_edges())
    }

    fn weight(&self, hits: u64) -> f64 {
        match self.weighting {
            Weighting::Presence => 1.0,
            Weighting::HitCount => hits as f64,
        }
    }

    fn histogram(&self, graph: &Dcfg) -> Histogram {
        let mut weights = FxHashMap::default();
        for node in graph.nodes() {
            weights.insert(Feature::Node(node.address), self.weight(node.hits));
        }
        if self.include_edges {
            for (from, to, hits) in graph.edges() {
                weights.insert(Feature::Edge(from, to), self.weight(hits));
            }
        }
        let norm_sq = weights.values().map(|w| w * w).sum();
        Histogram { weights, norm_sq }
    }

    fn kernel(a: &Histogram, b: &Histogram) -> f64 {
        let denom = (a.norm_sq * b.norm_sq).sqrt();
        if denom <= 0.0 {
            return 0.0;
        }
        (a.dot(b) / denom).clamp(0.0, 1.0)
    }
}

impl SimilarityProvider<Dcfg> for HitHistogramSimilarity {
    fn similarity(&self, graphs: &[Dcfg]) -> Result<SimilarityMatrix, ProviderError> {
        let n = graphs.len();
        if n == 0 {
            return Err(ProviderError::invalid(PROVIDER, "empty graph collection"));
        }

        let histograms: Vec<Histogram> = graphs.par_iter().map(|g| self.histogram(g)).collect();

        // Upper triangle in parallel, mirrored below.
        let upper: Vec<(usize, usize, f64)> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                let histograms = &histograms;
                ((i + 1)..n).map(move |j| (i, j, Self::kernel(&histograms[i], &histograms[j])))
            })
            .collect();

        let mut matrix = SquareMatrix::filled(n, 0.0, 1.0);
        for (i, j, value) in upper {
            matrix.set(i, j, value);
            matrix.set(j, i, value);
        }

        debug!(graphs = n, provider = PROVIDER, "similarity matrix built");
        SimilarityMatrix::new(matrix).map_err(|message| ProviderError::invalid(PROVIDER, message))
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
