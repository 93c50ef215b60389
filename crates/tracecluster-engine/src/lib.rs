//! # tracecluster-engine
//!
//! Clustering orchestration and evaluation over a precomputed similarity
//! matrix: outlier filtering, adaptive cluster-count selection, label
//! reconciliation into input order, and external quality metrics.

pub mod metrics;
pub mod outlier_filter;
pub mod pipeline;
pub mod primitives;
pub mod reconciler;
pub mod report;
pub mod selector;
pub mod truth;

pub use outlier_filter::OutlierFilter;
pub use pipeline::{ClusterPipeline, ClusterRun};
pub use reconciler::reconcile;
pub use selector::{ClusterSelector, Selection, SelectionRound};
