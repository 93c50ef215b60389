//! Error handling for trace clustering.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod metrics_error;
pub mod pipeline_error;
pub mod provider_error;
pub mod trace_error;

pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use metrics_error::MetricsError;
pub use pipeline_error::{PipelineError, PipelineStage};
pub use provider_error::ProviderError;
pub use trace_error::TraceError;
