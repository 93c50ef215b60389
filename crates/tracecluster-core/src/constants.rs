//! Workspace-wide constants.

/// Default upper bound on the number of clusters tried by the selector.
pub const DEFAULT_MAX_CLUSTER: usize = 16;

/// Default outlier ratio. Zero disables outlier detection entirely.
pub const DEFAULT_OUTLIER_RATIO: f64 = 0.0;

/// Default β for the F-measure.
pub const DEFAULT_F_BETA: f64 = 1.0;

/// Smallest cluster-count bound a caller may request.
pub const MIN_CLUSTER_BOUND: usize = 2;

/// A clustering run needs strictly more than two traces.
pub const MIN_TRACE_COUNT: usize = 3;

/// The selector stops after this many consecutive score decreases.
pub const MAX_CONSECUTIVE_DECREASES: u32 = 2;

/// Quality score assigned to the virtual single-cluster round.
pub const SINGLE_CLUSTER_SCORE: f64 = 0.0;

/// Rendered form of the outlier sentinel in reports.
pub const OUTLIER_SENTINEL: &str = "inf";

/// Tolerance used when checking similarity matrix symmetry and range.
pub const MATRIX_TOLERANCE: f64 = 1e-9;

/// Project config file name looked up in the working root.
pub const PROJECT_CONFIG_FILE: &str = "tracecluster.toml";

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "TRACECLUSTER_LOG";

/// Prefix of report files written by the CLI.
pub const REPORT_FILE_PREFIX: &str = "report_";
