//! Run a parametrised tree sweep over a group of threads standing in for processes
use clap::{Parser, ValueEnum};
use graphcompute::{
    compute::generators::{ChildrenInteraction, ParentInteraction, SelfInteraction},
    graph::helpers::random_tree_fixture,
    traits::types::PhaseType,
    GraphCompute, ThreadTransport, Transport, TreeNode,
};
use itertools::Itertools;
use rayon::ThreadPoolBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;

type Node = TreeNode<f64>;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Sweep {
    /// Nodes accumulate their children, leaves first
    Upward,
    /// Nodes accumulate their parent, root first
    Downward,
    /// Nodes only interact with themselves
    Local,
}

/// Struct for parsing command-line arguments
#[derive(Parser)]
struct Args {
    #[arg(long, default_value_t = String::from("x"))]
    id: String,

    /// Number of simulated processes
    #[arg(long, default_value_t = 4)]
    n_procs: i32,

    /// Number of nodes in the global tree
    #[arg(long, default_value_t = 100000)]
    n_nodes: usize,

    /// Seed of the random tree
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Sweep to run
    #[arg(long, value_enum, default_value_t = Sweep::Upward)]
    sweep: Sweep,

    /// Rayon threads used during generation
    #[arg(long, default_value_t = 1)]
    n_threads: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    ThreadPoolBuilder::new()
        .num_threads(args.n_threads)
        .build_global()
        .unwrap();

    let add = |target: &mut Node, source: &Node| {
        target.payload += source.payload;
        true
    };

    let times = ThreadTransport::run(args.n_procs, |transport| {
        let rank = transport.rank();
        let mut graph = random_tree_fixture(args.n_nodes, args.seed, args.n_procs, rank);
        let mut compute = GraphCompute::new(transport).unwrap();

        let success = match args.sweep {
            Sweep::Upward => compute.compute(&mut graph, &ChildrenInteraction::new(), &add),
            Sweep::Downward => compute.compute(&mut graph, &ParentInteraction::new(), &add),
            Sweep::Local => compute.compute(&mut graph, &SelfInteraction::new(false), &add),
        };

        info!(rank, n_local = graph.len(), case = ?compute.combine_case(), "finished");

        (success, compute.times().to_vec())
    });

    assert!(times.iter().all(|(success, _)| *success));

    // Slowest process per phase
    let phases = [
        PhaseType::Total,
        PhaseType::Generate,
        PhaseType::Detect,
        PhaseType::Combine,
    ];

    let slowest = phases
        .iter()
        .map(|phase| {
            times
                .iter()
                .flat_map(|(_, t)| t.iter().filter(|t| t.phase == *phase).map(|t| t.time))
                .max()
                .unwrap_or(0)
        })
        .collect_vec();

    println!("id,n_procs,n_nodes,sweep,total,generate,detect,combine");
    println!(
        "{},{},{},{:?},{}",
        args.id,
        args.n_procs,
        args.n_nodes,
        args.sweep,
        slowest.iter().join(",")
    );
}
