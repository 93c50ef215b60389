//! `GraphBuilder` implementation reading trace files from disk.

use tracecluster_core::errors::TraceError;
use tracecluster_core::traits::GraphBuilder;
use tracecluster_core::types::Trace;
use tracing::debug;

use super::types::Dcfg;
use crate::trace_file::read_trace;

/// Builds one [`Dcfg`] per trace file.
///
/// With a tail radius set, only the ego graph around the last address is
/// kept, which focuses similarity on how each run ended.
#[derive(Debug, Clone, Copy, Default)]
pub struct DcfgBuilder {
    tail_radius: Option<usize>,
}

impl DcfgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tail_radius(mut self, radius: usize) -> Self {
        self.tail_radius = Some(radius);
        self
    }

    pub fn tail_radius(&self) -> Option<usize> {
        self.tail_radius
    }
}

impl GraphBuilder<Dcfg> for DcfgBuilder {
    fn build(&self, trace: &Trace) -> Result<Dcfg, TraceError> {
        let addresses = read_trace(&trace.path)?;
        let origin = trace.display_path();
        let graph = Dcfg::from_addresses(addresses).ok_or(TraceError::Empty { path: origin })?;

        debug!(
            position = trace.position,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built dcfg"
        );

        Ok(match self.tail_radius {
            Some(radius) => graph.tail_ego(radius),
            None => graph,
        })
    }
}
