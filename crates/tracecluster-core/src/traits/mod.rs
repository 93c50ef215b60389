//! Contracts with the collaborators a clustering run consumes as black boxes.

pub mod anomaly;
pub mod graph_builder;
pub mod partitioner;
pub mod quality;
pub mod similarity;

pub use anomaly::AnomalyDetector;
pub use graph_builder::GraphBuilder;
pub use partitioner::Partitioner;
pub use quality::QualityScorer;
pub use similarity::SimilarityProvider;
