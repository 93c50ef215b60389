//! Graph-to-graph similarity providers.

pub mod histogram;

pub use histogram::HitHistogramSimilarity;
