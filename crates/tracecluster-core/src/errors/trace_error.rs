//! Trace reading and graph construction errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while turning a trace file into a graph.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("Failed to read trace {path}: {message}")]
    Io { path: String, message: String },

    #[error("Trace {path} contains no addresses")]
    Empty { path: String },

    #[error("Invalid address in {path} at line {line}: {content:?}")]
    InvalidAddress {
        path: String,
        line: usize,
        content: String,
    },
}

impl ErrorCode for TraceError {
    fn error_code(&self) -> &'static str {
        error_code::TRACE_ERROR
    }
}
