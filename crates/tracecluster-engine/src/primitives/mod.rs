//! Default collaborators: k-medoids partitioning, silhouette scoring and
//! Z-score anomaly detection. Each satisfies one collaborator trait and can
//! be swapped for any other implementation.

pub mod kmedoids;
pub mod silhouette;
pub mod zscore;

pub use kmedoids::KMedoids;
pub use silhouette::Silhouette;
pub use zscore::ZScoreDetector;
