use thiserror::Error;

use crate::bitset::NodeId;

/// Structural problems that make a graph unsuitable for dominance analysis.
///
/// Every analysis is deterministic, so none of these are worth retrying
/// without changing the input graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("graph has no entry node")]
    EmptyGraph,

    #[error("node {id} is outside the dense id range 0..{len}")]
    NonDenseIds { len: usize, id: NodeId },

    #[error("node n1 must be a successor of the entry")]
    MissingFirstSuccessor,

    #[error("node {0} is unreachable from the entry")]
    Unreachable(NodeId),

    #[error("a generated graph needs at least 2 nodes, got {0}")]
    TooFewNodes(usize),
}

pub type Result<T> = std::result::Result<T, DomError>;
