use std::collections::{BTreeMap, BTreeSet};
use smallvec::SmallVec;

use crate::bitset::{NodeId, NodeSet};
use crate::dot::Dot;
use crate::error::{DomError, Result};

/// The designated entry node of every graph.
pub const ENTRY: NodeId = NodeId::new(0);

pub type Successors = SmallVec<[NodeId; 4]>;

/// Edge endpoints of one node. Sized by the number of edges rather than by
/// the largest id, unlike a `NodeSet`.
pub type Adjacency = BTreeSet<NodeId>;

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub(crate) successors: Adjacency,
    pub(crate) predecessors: Adjacency,
    pub(crate) dominators: NodeSet,
    pub(crate) idom: Option<NodeId>,
    pub(crate) frontier: NodeSet,
}

impl Node {
    pub fn successors(&self) -> &Adjacency {
        &self.successors
    }

    pub fn predecessors(&self) -> &Adjacency {
        &self.predecessors
    }

    /// Every node on all paths from the entry to this node, itself included.
    /// Empty until the dominators have been computed.
    pub fn dominators(&self) -> &NodeSet {
        &self.dominators
    }

    pub fn immediate_dominator(&self) -> Option<NodeId> {
        self.idom
    }

    pub fn dominance_frontier(&self) -> &NodeSet {
        &self.frontier
    }
}

/// How far the analyses stored on the nodes are valid for the current edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Stage {
    #[default]
    Stale,
    Dominators,
    Frontier,
}

/// A directed graph keyed by node id, with node 0 as the entry.
///
/// Besides the edges, every node carries the results of the analyses run on
/// the graph (dominators, immediate dominator, dominance frontier). Analyses
/// that depend on earlier ones read those fields back; adding an edge marks
/// them stale.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    pub(crate) stage: Stage,
}

impl Graph {
    pub fn new() -> Graph {
        Graph::default()
    }

    pub fn from_edges(edges: impl IntoIterator<Item = (usize, usize)>) -> Graph {
        let mut graph = Graph::new();
        for (from, to) in edges {
            graph.connect(NodeId::new(from), NodeId::new(to));
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Creates the node if it does not exist yet.
    pub fn ensure(&mut self, id: NodeId) -> &mut Node {
        if !self.nodes.contains_key(&id) {
            self.stage = Stage::Stale;
        }
        self.nodes.entry(id).or_default()
    }

    /// Adds the edge `from -> to`, creating either end on first reference.
    /// Returns false if the edge already existed.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> bool {
        self.ensure(to);
        let added = self.ensure(from).successors.insert(to);
        if added {
            self[to].predecessors.insert(from);
            self.stage = Stage::Stale;
        }
        added
    }

    pub fn succs(&self, id: NodeId) -> Successors {
        match self.nodes.get(&id) {
            Some(node) => node.successors.iter().copied().collect(),
            None => Successors::new(),
        }
    }

    /// All edges as `(from, to)` pairs, ordered by `from` then `to`.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes
            .iter()
            .flat_map(|(&from, node)| node.successors.iter().map(move |&to| (from, to)))
            .collect()
    }

    /// Checks the shape every dominance analysis relies on: ids are exactly
    /// `0..len`, and node 1 (when there is more than the entry) is a
    /// successor of the entry. Reachability is checked by the traversal.
    pub fn validate(&self) -> Result<()> {
        let len = self.nodes.len();
        let Some(&last) = self.nodes.keys().next_back() else {
            return Err(DomError::EmptyGraph);
        };
        // Keys are unique, so the largest being below `len` means 0..len.
        if last.index() >= len {
            return Err(DomError::NonDenseIds { len, id: last });
        }
        if len > 1 && !self[ENTRY].successors.contains(&NodeId::new(1)) {
            return Err(DomError::MissingFirstSuccessor);
        }
        Ok(())
    }

    pub fn dot(&self) -> Dot<'_> {
        Dot(self)
    }
}

impl std::ops::Index<NodeId> for Graph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[&id]
    }
}

impl std::ops::IndexMut<NodeId> for Graph {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes.get_mut(&id).unwrap_or_else(|| panic!("no node {id} in graph"))
    }
}

impl std::fmt::Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (id, node) in &self.nodes {
            write!(f, "{id}: succs {:?} preds {:?} doms {:?}", node.successors, node.predecessors, node.dominators)?;
            match node.idom {
                Some(idom) => write!(f, " idom {idom}")?,
                None => write!(f, " idom -")?,
            }
            writeln!(f, " df {:?}", node.frontier)?;
        }
        Ok(())
    }
}
