use smallvec::SmallVec;

use crate::bitset::{NodeId, NodeSet};
use crate::error::Result;
use crate::graph::{Graph, Stage, ENTRY};
use crate::rpo::ReversePostorder;

impl Graph {
    /// Computes the dominance frontier of every node, stores it on the
    /// nodes, and returns it as a new graph with an edge `x -> n` for every
    /// `n` in the frontier of `x`.
    ///
    /// `n` is in the frontier of `x` when `x` dominates a predecessor of `n`
    /// but does not strictly dominate `n`. For each predecessor of `n` we
    /// climb the dominator tree until we hit `idom(n)`; every node passed on
    /// the way has `n` in its frontier.
    pub fn dominance_frontier(&mut self) -> Result<Graph> {
        if self.stage < Stage::Dominators {
            self.dominator_tree()?;
        }
        for node in self.nodes.values_mut() {
            node.frontier = NodeSet::new();
        }

        let ids: Vec<NodeId> = self.node_ids().collect();
        for id in ids {
            let idom = self[id].idom;
            let preds: SmallVec<[NodeId; 4]> = self[id].predecessors.iter().copied().collect();
            for pred in preds {
                let mut runner = pred;
                while Some(runner) != idom {
                    self[runner].frontier.insert(id);
                    if runner == ENTRY {
                        break;
                    }
                    let Some(up) = self[runner].idom else { break };
                    runner = up;
                }
            }
        }
        self.stage = Stage::Frontier;

        let frontier = self.frontier_graph();
        log::debug!("dominance frontier has {} edges", frontier.edges().len());
        Ok(frontier)
    }

    /// Closes the dominance frontier under "frontier of a frontier member":
    /// the result contains every edge of the frontier graph, and whenever
    /// `a -> b` is in the result and `b -> c` is a frontier edge, so is
    /// `a -> c`.
    ///
    /// Frontier nodes are visited in the reverse postorder of this graph.
    /// Each node remembers which nodes reach it; visiting a node links all
    /// of those directly to each of its children. Sweeps repeat until no new
    /// edge appears, which also covers frontier edges that point backwards
    /// in the order.
    pub fn iterated_dominance_frontier(&mut self) -> Result<Graph> {
        let mut idf = if self.stage < Stage::Frontier {
            self.dominance_frontier()?
        } else {
            self.frontier_graph()
        };
        let rpo = ReversePostorder::compute(self, ENTRY);
        let order: Vec<NodeId> = rpo.iter().filter(|&id| idf.contains(id)).collect();
        let mut remembered = vec![NodeSet::new(); self.len()];

        let mut sweeps = 0;
        loop {
            sweeps += 1;
            let mut changed = false;
            for &id in &order {
                let origins = remembered[id.index()].clone();
                for child in idf.succs(id) {
                    changed |= remembered[child.index()].insert(id);
                    for origin in origins.iter() {
                        changed |= idf.connect(origin, child);
                    }
                }
            }
            if !changed {
                break;
            }
        }
        log::debug!("iterated dominance frontier has {} edges after {sweeps} sweeps", idf.edges().len());
        Ok(idf)
    }

    fn frontier_graph(&self) -> Graph {
        let mut frontier = Graph::new();
        for (&id, node) in &self.nodes {
            for member in node.frontier.iter() {
                frontier.connect(id, member);
            }
        }
        frontier
    }
}

#[cfg(test)]
mod frontier_tests {
    use crate::bitset::NodeId;
    use crate::graph::{Graph, ENTRY};
    use expect_test::{expect, Expect};

    fn n(id: usize) -> NodeId {
        NodeId::new(id)
    }

    fn lecture() -> Graph {
        Graph::from_edges([(0, 1), (1, 2), (1, 5), (2, 3), (3, 4), (3, 1), (5, 6), (5, 8), (6, 7), (7, 3), (8, 7)])
    }

    fn check_df(edges: &[(usize, usize)], expect: Expect) {
        let mut graph = Graph::from_edges(edges.iter().copied());
        let df = graph.dominance_frontier().unwrap();
        expect.assert_eq(format!("{:?}", df.edges()).as_str());
    }

    fn check_idf(edges: &[(usize, usize)], expect: Expect) {
        let mut graph = Graph::from_edges(edges.iter().copied());
        let idf = graph.iterated_dominance_frontier().unwrap();
        expect.assert_eq(format!("{:?}", idf.edges()).as_str());
    }

    #[test]
    fn test_diamond_frontier() {
        let mut graph = Graph::from_edges([(0, 1), (1, 2), (1, 3), (2, 4), (3, 4)]);
        let df = graph.dominance_frontier().unwrap();
        expect!["[(n2, n4), (n3, n4)]"].assert_eq(&format!("{:?}", df.edges()));
        assert!(graph[n(4)].dominance_frontier().is_empty());
        expect!["{n4}"].assert_eq(&format!("{:?}", graph[n(2)].dominance_frontier()));
        expect!["{n4}"].assert_eq(&format!("{:?}", graph[n(3)].dominance_frontier()));
    }

    #[test]
    fn test_loop_frontier() {
        check_df(&[(0, 1), (1, 2), (2, 1), (1, 3)], expect!["[(n1, n1), (n2, n1)]"]);
    }

    #[test]
    fn test_self_loop_frontier() {
        check_df(&[(0, 1), (1, 1), (1, 2)], expect!["[(n1, n1)]"]);
    }

    #[test]
    fn test_entry_in_frontier() {
        check_df(&[(0, 1), (1, 2), (2, 0)], expect!["[(n0, n0), (n1, n0), (n2, n0)]"]);
    }

    #[test]
    fn test_lecture_frontier() {
        check_df(
            &[(0, 1), (1, 2), (1, 5), (2, 3), (3, 4), (3, 1), (5, 6), (5, 8), (6, 7), (7, 3), (8, 7)],
            expect!["[(n1, n1), (n2, n3), (n3, n1), (n5, n3), (n6, n7), (n7, n3), (n8, n7)]"],
        );
    }

    #[test]
    fn test_frontier_without_tree_first() {
        let mut graph = lecture();
        graph.dominance_frontier().unwrap();
        assert_eq!(graph[n(7)].immediate_dominator(), Some(n(5)));
    }

    #[test]
    fn test_frontier_is_recomputed() {
        let mut graph = Graph::from_edges([(0, 1), (1, 2), (1, 3), (2, 4), (3, 4)]);
        graph.dominance_frontier().unwrap();
        graph.connect(n(4), n(1));
        let df = graph.dominance_frontier().unwrap();
        expect!["[(n1, n1), (n2, n4), (n3, n4), (n4, n1)]"].assert_eq(&format!("{:?}", df.edges()));
    }

    #[test]
    fn test_diamond_idf() {
        check_idf(&[(0, 1), (1, 2), (1, 3), (2, 4), (3, 4)], expect!["[(n2, n4), (n3, n4)]"]);
    }

    #[test]
    fn test_loop_idf() {
        check_idf(&[(0, 1), (1, 2), (2, 1), (1, 3)], expect!["[(n1, n1), (n2, n1)]"]);
    }

    #[test]
    fn test_lecture_idf() {
        check_idf(
            &[(0, 1), (1, 2), (1, 5), (2, 3), (3, 4), (3, 1), (5, 6), (5, 8), (6, 7), (7, 3), (8, 7)],
            expect![
                "[(n1, n1), (n2, n1), (n2, n3), (n3, n1), (n5, n1), (n5, n3), (n6, n1), (n6, n3), (n6, n7), (n7, n1), (n7, n3), (n8, n1), (n8, n3), (n8, n7)]"
            ],
        );
    }

    #[test]
    fn test_idf_reuses_frontier() {
        let mut graph = lecture();
        let df = graph.dominance_frontier().unwrap();
        let idf = graph.iterated_dominance_frontier().unwrap();
        for (from, to) in df.edges() {
            assert!(idf.succs(from).contains(&to));
        }
        assert_eq!(graph[ENTRY].immediate_dominator(), None);
    }

    #[test]
    fn test_empty_frontier() {
        check_idf(&[(0, 1), (1, 2), (2, 3)], expect!["[]"]);
    }
}
