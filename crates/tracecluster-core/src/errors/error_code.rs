//! ErrorCode trait for stable, machine-readable error identifiers.

/// Every error enum implements this to expose a structured error code
/// string alongside its human-readable message.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const TRACE_ERROR: &str = "TRACE_ERROR";
pub const PROVIDER_FAILED: &str = "PROVIDER_FAILED";
pub const SHAPE_MISMATCH: &str = "SHAPE_MISMATCH";
pub const UNDEFINED_SCORE: &str = "UNDEFINED_SCORE";
pub const METRICS_ERROR: &str = "METRICS_ERROR";
pub const LENGTH_MISMATCH: &str = "LENGTH_MISMATCH";
