//? mpirun -n {{NPROCESSES}} --features "mpi"

#[cfg(feature = "mpi")]
fn main() {
    use graphcompute::{
        compute::generators::{ChildrenInteraction, ParentInteraction},
        graph::helpers::split_tree_fixture,
        AlgorithmChoice, GraphCompute, TreeNode,
    };
    use mpi::traits::Communicator;
    use tracing_subscriber::EnvFilter;

    type Node = TreeNode<f64>;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let universe = mpi::initialize().unwrap();
    let world = universe.world();
    let comm = world.duplicate();
    let rank = comm.rank();
    let size = comm.size();

    // Tree parameters, subtrees below the split level are dealt out to ranks
    let depth = 4;
    let branching = 3;
    let split_level = 2;

    let mut compute = GraphCompute::new(comm).unwrap();

    // Downward accumulation of depths, each node ends up holding its level
    {
        let mut graph = split_tree_fixture(depth, branching, split_level, size, rank, 0.0);

        let increment = |target: &mut Node, source: &Node| {
            target.payload = source.payload + 1.0;
            true
        };

        assert!(compute.compute(&mut graph, &ParentInteraction::new(), &increment));
        assert_eq!(
            compute.combine_case(),
            Some(AlgorithmChoice::DownwardAccumulateSpecial)
        );

        for node in graph.iter() {
            assert_eq!(node.payload, node.level as f64);
        }

        if rank == 0 {
            println!("...test_downward_accumulation passed");
        }
    }

    // Upward accumulation of subtree sizes, the global root holds the size of the tree
    {
        let mut graph = split_tree_fixture(depth, branching, split_level, size, rank, 1.0);

        let add = |target: &mut Node, source: &Node| {
            target.payload += source.payload;
            true
        };

        assert!(compute.compute(&mut graph, &ChildrenInteraction::new(), &add));
        assert_eq!(
            compute.combine_case(),
            Some(AlgorithmChoice::UpwardAccumulateSpecial)
        );

        for node in graph.iter() {
            let height = depth - node.level;
            let expected = (0..=height).map(|l| branching.pow(l as u32)).sum::<usize>();
            assert_eq!(node.payload, expected as f64);
        }

        if rank == 0 {
            println!("...test_upward_accumulation passed");
        }
    }
}

#[cfg(not(feature = "mpi"))]
fn main() {}
