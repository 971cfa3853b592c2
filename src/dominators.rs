use crate::bitset::{NodeId, NodeSet};
use crate::error::{DomError, Result};
use crate::graph::{Graph, Stage, ENTRY};
use crate::rpo::ReversePostorder;

impl Graph {
    /// Computes the full dominator set of every node and stores it on the
    /// nodes. Returns the traversal order used for the fixpoint.
    ///
    /// Every non-entry node starts out dominated by every node; sweeps in
    /// reverse postorder then shrink each set to the intersection of its
    /// predecessors' sets plus itself, until a sweep changes nothing.
    pub fn compute_dominators(&mut self) -> Result<ReversePostorder> {
        self.validate()?;
        let rpo = ReversePostorder::compute(self, ENTRY);
        if let Some(id) = self.node_ids().find(|&id| !rpo.contains(id)) {
            return Err(DomError::Unreachable(id));
        }

        let all: NodeSet = self.node_ids().collect();
        let mut doms = vec![all; self.len()];
        doms[ENTRY.index()] = NodeSet::one(ENTRY);

        let mut sweeps = 0;
        loop {
            sweeps += 1;
            let mut changed = false;
            for id in rpo.iter().filter(|&id| id != ENTRY) {
                let mut preds = self[id].predecessors.iter().copied();
                let mut new = match preds.next() {
                    Some(first) => doms[first.index()].clone(),
                    None => NodeSet::new(),
                };
                for pred in preds {
                    new.intersect_with(&doms[pred.index()]);
                }
                new.insert(id);
                // Sets only ever shrink, so a change shows in the size.
                if new.len() != doms[id.index()].len() {
                    doms[id.index()] = new;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        log::debug!("dominators of {} nodes converged after {sweeps} sweeps", rpo.len());

        for (id, node) in self.nodes.iter_mut() {
            node.dominators = std::mem::take(&mut doms[id.index()]);
            node.idom = None;
            node.frontier = NodeSet::new();
        }
        self.stage = Stage::Stale;
        Ok(rpo)
    }

    /// Builds the dominator tree as a new graph with an edge
    /// `idom(n) -> n` for every non-entry node, recording each immediate
    /// dominator on this graph's nodes along the way.
    pub fn dominator_tree(&mut self) -> Result<Graph> {
        let rpo = self.compute_dominators()?;
        let mut idoms = vec![None; self.len()];
        for id in rpo.iter().filter(|&id| id != ENTRY) {
            let idom = immediate_dominator(self, &rpo, &idoms, id).ok_or(DomError::Unreachable(id))?;
            idoms[id.index()] = Some(idom);
        }
        for (id, node) in self.nodes.iter_mut() {
            node.idom = idoms[id.index()];
        }
        self.stage = Stage::Dominators;
        let tree = self.tree_from_idoms();
        log::debug!("dominator tree has {} edges", rpo.len() - 1);
        Ok(tree)
    }

    /// Returns the dominator tree, reusing the immediate dominators on the
    /// nodes if they are current.
    pub(crate) fn current_dominator_tree(&mut self) -> Result<Graph> {
        if self.stage >= Stage::Dominators {
            Ok(self.tree_from_idoms())
        } else {
            self.dominator_tree()
        }
    }

    fn tree_from_idoms(&self) -> Graph {
        let mut tree = Graph::new();
        tree.ensure(ENTRY);
        for (&id, node) in &self.nodes {
            if let Some(idom) = node.idom {
                tree.connect(idom, id);
            }
        }
        tree
    }
}

/// The strict dominator of `id` that every other strict dominator of `id`
/// dominates.
///
/// All strict dominators of `id` dominate each of its predecessors, so they
/// lie on the idom chain of the earliest ranked predecessor. Climbing that
/// chain, the first node found in `dom(id)` is the closest one. `idoms` must
/// already hold every node ranked before `id`.
fn immediate_dominator(
    graph: &Graph,
    rpo: &ReversePostorder,
    idoms: &[Option<NodeId>],
    id: NodeId,
) -> Option<NodeId> {
    let node = &graph[id];
    let mut runner = node.predecessors.iter().copied().min_by_key(|&pred| rpo.rank(pred))?;
    while !node.dominators.contains(runner) {
        runner = idoms[runner.index()]?;
    }
    Some(runner)
}
