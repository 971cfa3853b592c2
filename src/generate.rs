use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::bitset::NodeId;
use crate::error::{DomError, Result};
use crate::graph::{Graph, ENTRY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateConfig {
    pub nodes: usize,
    /// Upper bound on the forward edges drawn for each node.
    pub max_children: usize,
    /// Extra edges `u -> v` with `1 <= v <= u`, making loops.
    pub back_edges: usize,
    pub seed: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        GenerateConfig { nodes: 10, max_children: 3, back_edges: 0, seed: 0 }
    }
}

/// Builds a random layered graph that every analysis accepts: ids are
/// `0..nodes`, the entry's only successor is node 1, and every node is
/// reachable from the entry.
///
/// Forward edges only ever go from a lower id to a higher one, and a node
/// left without a predecessor is hooked up to the node just before it.
/// Back edges never target the entry.
pub fn generate(config: &GenerateConfig) -> Result<Graph> {
    if config.nodes < 2 {
        return Err(DomError::TooFewNodes(config.nodes));
    }
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut graph = Graph::new();
    for id in 0..config.nodes {
        graph.ensure(NodeId::new(id));
    }
    graph.connect(ENTRY, NodeId::new(1));

    let last = config.nodes - 1;
    for row in 1..last {
        let children = rng.gen_range(1..=config.max_children.max(1));
        for _ in 0..children {
            let target = rng.gen_range(row + 1..=last);
            graph.connect(NodeId::new(row), NodeId::new(target));
        }
    }
    for id in 2..config.nodes {
        let id = NodeId::new(id);
        if graph[id].predecessors.is_empty() {
            graph.connect(NodeId::new(id.index() - 1), id);
        }
    }
    for _ in 0..config.back_edges {
        let from = rng.gen_range(1..config.nodes);
        let to = rng.gen_range(1..=from);
        graph.connect(NodeId::new(from), NodeId::new(to));
    }

    log::debug!("generated {} nodes, {} edges (seed {})", graph.len(), graph.edges().len(), config.seed);
    Ok(graph)
}
