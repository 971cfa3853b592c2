//! Dominance analyses over a directed graph with a single entry node.
//!
//! A [`Graph`] is built edge by edge with [`Graph::connect`]. From it the
//! analyses derive, each as a new graph: the dominator tree
//! ([`Graph::dominator_tree`]), the dominance frontier
//! ([`Graph::dominance_frontier`]), the DJ graph ([`Graph::dj_graph`]) and
//! the iterated dominance frontier ([`Graph::iterated_dominance_frontier`]).
//! Intermediate results (dominator sets, immediate dominators, frontiers)
//! are kept on the input graph's nodes.

pub mod bitset;
pub mod dj;
pub mod dominators;
pub mod dot;
pub mod error;
pub mod frontier;
pub mod generate;
pub mod graph;
pub mod rpo;

pub use bitset::{NodeId, NodeSet};
pub use dj::DjGraph;
pub use error::{DomError, Result};
pub use generate::{generate, GenerateConfig};
pub use graph::{Graph, Node, ENTRY};
pub use rpo::ReversePostorder;

#[cfg(test)]
mod property_tests {
    use crate::{generate, Graph, GenerateConfig, NodeId, NodeSet, ReversePostorder, ENTRY};

    fn graphs() -> impl Iterator<Item = Graph> {
        (0..40u64).flat_map(|seed| {
            [2, 4, 9, 17, 33].into_iter().map(move |nodes| {
                let config = GenerateConfig { nodes, max_children: 3, back_edges: (seed as usize) % 4, seed };
                generate(&config).unwrap()
            })
        })
    }

    /// Nodes reachable from the entry without passing through `removed`.
    fn reachable_without(graph: &Graph, removed: NodeId) -> NodeSet {
        let mut seen = NodeSet::new();
        if removed == ENTRY {
            return seen;
        }
        let mut worklist = vec![ENTRY];
        seen.insert(ENTRY);
        while let Some(id) = worklist.pop() {
            for succ in graph.succs(id) {
                if succ != removed && seen.insert(succ) {
                    worklist.push(succ);
                }
            }
        }
        seen
    }

    fn dominates(graph: &Graph, a: NodeId, b: NodeId) -> bool {
        graph[b].dominators().contains(a)
    }

    #[test]
    fn test_dominators_match_path_definition() {
        for mut graph in graphs() {
            graph.compute_dominators().unwrap();
            for x in graph.node_ids() {
                let reachable = reachable_without(&graph, x);
                for n in graph.node_ids() {
                    let expected = n == x || !reachable.contains(n);
                    assert_eq!(dominates(&graph, x, n), expected, "{x} dom {n}\n{graph}");
                }
            }
        }
    }

    #[test]
    fn test_dominators_are_chains() {
        for mut graph in graphs() {
            graph.compute_dominators().unwrap();
            for n in graph.node_ids() {
                let doms = graph[n].dominators();
                assert!(doms.contains(ENTRY) && doms.contains(n));
                for a in doms.iter() {
                    for b in doms.iter() {
                        assert!(dominates(&graph, a, b) || dominates(&graph, b, a));
                    }
                }
            }
        }
    }

    #[test]
    fn test_tree_shape() {
        for mut graph in graphs() {
            let tree = graph.dominator_tree().unwrap();
            assert_eq!(tree.len(), graph.len());
            assert!(tree[ENTRY].predecessors().is_empty());
            for n in graph.node_ids().filter(|&n| n != ENTRY) {
                let parent = graph[n].immediate_dominator().unwrap();
                assert_eq!(tree[n].predecessors().iter().copied().collect::<Vec<_>>(), vec![parent]);
                // idom(n) is dominated by every other strict dominator of n.
                for d in graph[n].dominators().iter().filter(|&d| d != n) {
                    assert!(dominates(&graph, d, parent));
                }
            }
            assert_eq!(ReversePostorder::compute(&tree, ENTRY).len(), tree.len());
        }
    }

    #[test]
    fn test_frontier_definition() {
        for mut graph in graphs() {
            let df = graph.dominance_frontier().unwrap();
            for x in graph.node_ids() {
                for n in graph.node_ids() {
                    let strictly = x != n && dominates(&graph, x, n);
                    let expected = !strictly && graph[n].predecessors().iter().any(|&p| dominates(&graph, x, p));
                    assert_eq!(graph[x].dominance_frontier().contains(n), expected, "{n} in DF({x})\n{graph}");
                    assert_eq!(df.succs(x).contains(&n), expected);
                }
            }
        }
    }

    #[test]
    fn test_idf_is_closed() {
        for mut graph in graphs() {
            let df = graph.dominance_frontier().unwrap();
            let idf = graph.iterated_dominance_frontier().unwrap();
            for (a, b) in df.edges() {
                assert!(idf.succs(a).contains(&b));
            }
            for (a, b) in idf.edges() {
                for c in df.succs(b) {
                    assert!(idf.succs(a).contains(&c), "{a} -> {b} -> {c}");
                }
            }
        }
    }

    #[test]
    fn test_pipeline_order() {
        for mut graph in graphs().take(20) {
            let tree = graph.dominator_tree().unwrap();
            let df = graph.dominance_frontier().unwrap();
            let dj = graph.dj_graph().unwrap();
            let idf = graph.iterated_dominance_frontier().unwrap();
            for edge in tree.edges() {
                assert!(dj.graph.edges().contains(&edge));
            }
            assert_eq!(dj.graph.edges().len(), {
                let mut all = tree.edges();
                all.extend(dj.join_edges.iter().copied());
                all.sort();
                all.dedup();
                all.len()
            });
            assert!(df.edges().iter().all(|edge| idf.edges().contains(edge)));
        }
    }
}
