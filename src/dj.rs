use crate::bitset::NodeId;
use crate::error::Result;
use crate::graph::Graph;

/// The dominator tree with the join edges of the original graph laid on top.
#[derive(Debug, Clone)]
pub struct DjGraph {
    /// Dominator-tree edges and join edges together. An edge that is both
    /// appears once.
    pub graph: Graph,
    /// Every edge `p -> n` of the original graph where `n` has more than one
    /// predecessor, ordered by `n` then `p`.
    pub join_edges: Vec<(NodeId, NodeId)>,
}

impl Graph {
    pub fn dj_graph(&mut self) -> Result<DjGraph> {
        let mut graph = self.current_dominator_tree()?;
        let mut join_edges = vec![];
        for (&id, node) in self.nodes.iter().filter(|(_, node)| node.predecessors.len() > 1) {
            for &pred in &node.predecessors {
                graph.connect(pred, id);
                join_edges.push((pred, id));
            }
        }
        log::debug!("dj graph adds {} join edges", join_edges.len());
        Ok(DjGraph { graph, join_edges })
    }
}
