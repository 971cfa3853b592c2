use clap::{Parser, ValueEnum};
use domgraph::{generate, DomError, GenerateConfig};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    DomTree,
    Df,
    Dj,
    Idf,
}

/// Generates a random single-entry graph and prints it, followed by the
/// requested dominance analyses, as Graphviz DOT.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Number of nodes in the generated graph.
    #[arg(long, default_value_t = 10)]
    nodes: usize,

    /// Maximum forward edges drawn per node.
    #[arg(long, default_value_t = 3)]
    max_children: usize,

    /// Number of loop-forming back edges.
    #[arg(long, default_value_t = 0)]
    back_edges: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Analyses to print.
    #[arg(value_enum)]
    outputs: Vec<Output>,
}

fn main() -> Result<(), DomError> {
    env_logger::init();
    let args = Args::parse();
    let config = GenerateConfig {
        nodes: args.nodes,
        max_children: args.max_children,
        back_edges: args.back_edges,
        seed: args.seed,
    };
    let mut graph = generate(&config)?;
    println!("// graph\n{}", graph.dot());

    // Later analyses read back what the earlier ones left on the nodes.
    let tree = graph.dominator_tree()?;
    let df = graph.dominance_frontier()?;
    let dj = graph.dj_graph()?;
    let idf = graph.iterated_dominance_frontier()?;
    log::info!("{} nodes analyzed, {} join edges", graph.len(), dj.join_edges.len());

    let wants = |output| args.outputs.contains(&output);
    if wants(Output::DomTree) {
        println!("// dom-tree\n{}", tree.dot());
    }
    if wants(Output::Df) {
        println!("// df\n{}", df.dot());
    }
    if wants(Output::Dj) {
        println!("// dj\n{}", dj.graph.dot());
    }
    if wants(Output::Idf) {
        println!("// idf\n{}", idf.dot());
    }
    Ok(())
}
