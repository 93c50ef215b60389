//! DCFG types: nodes, edges, density.

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A visited instruction address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressNode {
    pub address: u64,
    pub hits: u64,
}

/// An observed transition between two consecutive addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEdge {
    pub hits: u64,
}

/// The DCFG of one trace.
pub struct Dcfg {
    /// The underlying petgraph DiGraph.
    pub graph: DiGraph<AddressNode, TransitionEdge>,
    /// Map from address → NodeIndex for O(1) lookup.
    pub node_index: FxHashMap<u64, NodeIndex>,
    /// Map from (from, to) → EdgeIndex for O(1) hit updates.
    edge_index: FxHashMap<(u64, u64), EdgeIndex>,
    head: u64,
    tail: u64,
}

impl Dcfg {
    /// Build a DCFG by counting hits along an address sequence.
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_addresses<I>(addresses: I) -> Option<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut iter = addresses.into_iter();
        let head = iter.next()?;

        let mut dcfg = Self {
            graph: DiGraph::new(),
            node_index: FxHashMap::default(),
            edge_index: FxHashMap::default(),
            head,
            tail: head,
        };

        let mut last = head;
        dcfg.hit_node(last);
        for addr in iter {
            dcfg.hit_edge(last, addr);
            dcfg.hit_node(addr);
            last = addr;
        }
        dcfg.tail = last;

        Some(dcfg)
    }

    /// An empty graph anchored at `head`/`tail`, filled in by callers.
    pub(crate) fn with_anchors(head: u64, tail: u64) -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: FxHashMap::default(),
            edge_index: FxHashMap::default(),
            head,
            tail,
        }
    }

    fn hit_node(&mut self, address: u64) -> NodeIndex {
        let idx = self.ensure_node(address);
        self.graph[idx].hits += 1;
        idx
    }

    fn hit_edge(&mut self, from: u64, to: u64) {
        if let Some(&edge) = self.edge_index.get(&(from, to)) {
            self.graph[edge].hits += 1;
            return;
        }
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        let edge = self.graph.add_edge(a, b, TransitionEdge { hits: 1 });
        self.edge_index.insert((from, to), edge);
    }

    fn ensure_node(&mut self, address: u64) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(&address) {
            return idx;
        }
        let idx = self.graph.add_node(AddressNode { address, hits: 0 });
        self.node_index.insert(address, idx);
        idx
    }

    /// Insert a node with a known hit count.
    pub(crate) fn insert_node(&mut self, node: AddressNode) {
        let idx = self.ensure_node(node.address);
        self.graph[idx].hits = node.hits;
    }

    /// Insert an edge with a known hit count. Both endpoints must exist.
    pub(crate) fn insert_edge(&mut self, from: u64, to: u64, edge: TransitionEdge) {
        if let (Some(&a), Some(&b)) = (self.node_index.get(&from), self.node_index.get(&to)) {
            let idx = self.graph.add_edge(a, b, edge);
            self.edge_index.insert((from, to), idx);
        }
    }

    /// First address of the trace.
    pub fn head(&self) -> u64 {
        self.head
    }

    /// Last address of the trace.
    pub fn tail(&self) -> u64 {
        self.tail
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Hit count of an address, if it was visited.
    pub fn node_hits(&self, address: u64) -> Option<u64> {
        self.node_index.get(&address).map(|&idx| self.graph[idx].hits)
    }

    /// Hit count of a transition, if it was observed.
    pub fn edge_hits(&self, from: u64, to: u64) -> Option<u64> {
        self.edge_index.get(&(from, to)).map(|&idx| self.graph[idx].hits)
    }

    /// All (address, hits) pairs.
    pub fn nodes(&self) -> impl Iterator<Item = &AddressNode> {
        self.graph.node_weights()
    }

    /// All (from, to, hits) triples.
    pub fn edges(&self) -> impl Iterator<Item = (u64, u64, u64)> + '_ {
        self.graph.edge_references().map(|e| {
            (
                self.graph[e.source()].address,
                self.graph[e.target()].address,
                e.weight().hits,
            )
        })
    }

    /// Directed simple-graph density |E| / (|V|·(|V|−1)).
    pub fn density(&self) -> f64 {
        let v = self.node_count() as f64;
        if v < 2.0 {
            return 0.0;
        }
        self.edge_count() as f64 / (v * (v - 1.0))
    }

    /// `None` for an edgeless graph, otherwise whether density exceeds 0.5.
    pub fn is_dense(&self) -> Option<bool> {
        if self.edge_count() == 0 {
            return None;
        }
        Some(self.density() > 0.5)
    }
}

impl std::fmt::Debug for Dcfg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dcfg")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("head", &format_args!("{:#x}", self.head))
            .field("tail", &format_args!("{:#x}", self.tail))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_node_and_edge_hits() {
        let g = Dcfg::from_addresses([1, 2, 3, 2, 3, 4]).unwrap();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.node_hits(2), Some(2));
        assert_eq!(g.node_hits(3), Some(2));
        assert_eq!(g.edge_hits(2, 3), Some(2));
        assert_eq!(g.edge_hits(3, 2), Some(1));
        assert_eq!(g.edge_hits(1, 3), None);
        assert_eq!(g.head(), 1);
        assert_eq!(g.tail(), 4);
    }

    #[test]
    fn self_loop_counts() {
        let g = Dcfg::from_addresses([7, 7, 7]).unwrap();
        assert_eq!(g.node_hits(7), Some(3));
        assert_eq!(g.edge_hits(7, 7), Some(2));
    }

    #[test]
    fn empty_sequence_has_no_graph() {
        assert!(Dcfg::from_addresses(Vec::<u64>::new()).is_none());
    }

    #[test]
    fn single_address_is_not_dense() {
        let g = Dcfg::from_addresses([5]).unwrap();
        assert_eq!(g.is_dense(), None);
        assert_eq!(g.density(), 0.0);
    }

    #[test]
    fn two_cycle_is_dense() {
        // 2 nodes, both directions observed: density 1.0
        let g = Dcfg::from_addresses([1, 2, 1]).unwrap();
        assert_eq!(g.is_dense(), Some(true));
    }

    #[test]
    fn chain_is_sparse() {
        let g = Dcfg::from_addresses([1, 2, 3, 4, 5]).unwrap();
        assert_eq!(g.is_dense(), Some(false));
        assert!((g.density() - 4.0 / 20.0).abs() < 1e-12);
    }
}
