use crate::errors::TraceError;
use crate::types::Trace;

/// Builds a per-trace graph representation (`build(trace) -> Graph`).
pub trait GraphBuilder<G>: Send + Sync {
    fn build(&self, trace: &Trace) -> Result<G, TraceError>;
}
