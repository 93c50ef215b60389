//! Ego subgraphs centred on the trace tail.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use super::types::Dcfg;

impl Dcfg {
    /// Induced subgraph of every node within `radius` undirected hops of the
    /// tail. Hit counts are copied unchanged.
    ///
    /// The ego graph keeps the original head when it falls inside the radius,
    /// otherwise the centre doubles as head.
    pub fn tail_ego(&self, radius: usize) -> Dcfg {
        let center = self.tail();
        let distances = self.undirected_distances(center, radius);

        let head = if self
            .node_index
            .get(&self.head())
            .is_some_and(|idx| distances.contains_key(idx))
        {
            self.head()
        } else {
            center
        };

        let mut ego = Dcfg::with_anchors(head, center);
        let mut kept: Vec<NodeIndex> = distances.keys().copied().collect();
        kept.sort_unstable();
        for idx in &kept {
            ego.insert_node(self.graph[*idx]);
        }
        for edge in self.graph.edge_references() {
            if distances.contains_key(&edge.source()) && distances.contains_key(&edge.target()) {
                ego.insert_edge(
                    self.graph[edge.source()].address,
                    self.graph[edge.target()].address,
                    *edge.weight(),
                );
            }
        }
        ego
    }

    /// Breadth-first hop distances from `center`, ignoring edge direction.
    fn undirected_distances(&self, center: u64, radius: usize) -> FxHashMap<NodeIndex, usize> {
        let mut distances = FxHashMap::default();
        let Some(&start) = self.node_index.get(&center) else {
            return distances;
        };

        distances.insert(start, 0);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            let depth = distances[&node];
            if depth == radius {
                continue;
            }
            for next in self.graph.neighbors_undirected(node) {
                if !distances.contains_key(&next) {
                    distances.insert(next, depth + 1);
                    queue.push_back(next);
                }
            }
        }
        distances
    }
}
