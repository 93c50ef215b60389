//! Structured span field names used across the pipeline.

/// Number of traces excluded as outliers.
pub const OUTLIER_COUNT: &str = "outlier_count";

/// Candidate cluster count of a selector round.
pub const CLUSTER_COUNT: &str = "k";

/// Internal quality score of a selector round.
pub const QUALITY_SCORE: &str = "score";

/// Similarity matrix construction time in milliseconds.
pub const SIMILARITY_BUILD_TIME: &str = "similarity_build_time";

/// Cluster search time in milliseconds.
pub const SELECTION_TIME: &str = "selection_time";
