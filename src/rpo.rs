use crate::bitset::{NodeId, NodeSet};
use crate::graph::{Graph, Successors};

/// Reverse postorder of the nodes reachable from an entry node.
///
/// The entry has rank 0. Along forward edges a predecessor always ranks
/// below its successor. Nodes that cannot be reached from the entry have no
/// rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversePostorder {
    order: Vec<NodeId>,
    ranks: Vec<Option<usize>>,
}

impl ReversePostorder {
    pub fn compute(graph: &Graph, entry: NodeId) -> ReversePostorder {
        let mut visited = NodeSet::new();
        let mut order = vec![];
        if graph.contains(entry) {
            po_from(graph, entry, &mut order, &mut visited);
        }
        order.reverse();
        let bound = graph.node_ids().last().map_or(0, |id| id.index() + 1);
        let mut ranks = vec![None; bound];
        for (rank, id) in order.iter().enumerate() {
            ranks[id.index()] = Some(rank);
        }
        log::trace!("rpo from {entry}: {order:?}");
        ReversePostorder { order, ranks }
    }

    pub fn rank(&self, id: NodeId) -> Option<usize> {
        self.ranks.get(id.index()).copied().flatten()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.rank(id).is_some()
    }

    /// Nodes in ascending rank.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Appends the postorder of everything reachable from `node` that is not yet
/// in `visited`.
///
/// The walk keeps its own stack of `(node, successors, next successor)`
/// frames, so the depth of the graph is not bounded by the call stack.
pub fn po_from(graph: &Graph, node: NodeId, result: &mut Vec<NodeId>, visited: &mut NodeSet) {
    if !visited.insert(node) {
        return;
    }
    let mut stack: Vec<(NodeId, Successors, usize)> = vec![(node, graph.succs(node), 0)];
    while let Some((current, succs, next)) = stack.last_mut() {
        let Some(&succ) = succs.get(*next) else {
            result.push(*current);
            stack.pop();
            continue;
        };
        *next += 1;
        if visited.insert(succ) {
            stack.push((succ, graph.succs(succ), 0));
        }
    }
}
