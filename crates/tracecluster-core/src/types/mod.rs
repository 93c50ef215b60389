//! Data model shared by every stage of a clustering run.

pub mod confusion;
pub mod labels;
pub mod matrix;
pub mod trace;

pub use confusion::ConfusionCounts;
pub use labels::{AnomalyFlag, ClusterLabel, LabelSequence, OutlierMask};
pub use matrix::{DistanceMatrix, SimilarityMatrix, SquareMatrix};
pub use trace::Trace;
