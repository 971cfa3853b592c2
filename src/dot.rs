use crate::graph::Graph;

const COLORS: [&str; 5] = ["lightcyan2", "azure", "powderblue", "pink", "violet"];

/// Graphviz rendering of a graph's nodes and edges, ready for `dot -Tpng`.
pub struct Dot<'a>(pub &'a Graph);

impl std::fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Dot(graph) = self;
        writeln!(f, "digraph G {{")?;
        for id in graph.node_ids() {
            let idx = id.index();
            let color = COLORS[idx % COLORS.len()];
            writeln!(f, "  node_{idx} [label = {idx}, style = \"filled\", shape = \"record\", fillcolor = \"{color}\"];")?;
        }
        for (from, to) in graph.edges() {
            writeln!(f, "  node_{} -> node_{};", from.index(), to.index())?;
        }
        writeln!(f, "}}")
    }
}
