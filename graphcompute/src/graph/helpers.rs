//! Helper functions used in testing and benchmarking graph computations.
use std::cmp::Ordering;

use bytemuck::Pod;
use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::types::{Graph, NodeIndex, TreeNode};

/// Partition a tree given by parent pointers over `size` ranks, returning the partition of `rank`.
///
/// Nodes above `split_level` are owned by rank 0. Nodes at `split_level` are dealt out to ranks
/// round robin, and every deeper node is owned by the owner of its ancestor at `split_level`, so
/// whole subtrees below the split are local to a single rank. Nodes on other ranks referenced by
/// local nodes become ghosts.
///
/// # Arguments
/// * `parents` - Parent of each node, nodes must be numbered so that parents precede children and
///   node 0 must be the only root.
/// * `split_level` - Level whose nodes are distributed.
/// * `size` - Number of ranks.
/// * `rank` - Rank whose partition is returned.
/// * `payload` - Initial payload of every node.
///
/// # Panics
/// If `size` is not positive.
pub fn partition_tree<T>(
    parents: &[Option<usize>],
    split_level: u64,
    size: i32,
    rank: i32,
    payload: T,
) -> Graph<TreeNode<T>>
where
    T: Pod + Send + Sync,
{
    let n_nodes = parents.len();

    let mut levels = vec![0u64; n_nodes];
    let mut owners = vec![0i32; n_nodes];
    let mut n_split = 0;

    for (i, parent) in parents.iter().enumerate() {
        if let Some(p) = *parent {
            levels[i] = levels[p] + 1;
        }
        owners[i] = match levels[i].cmp(&split_level) {
            Ordering::Less => 0,
            Ordering::Equal => {
                n_split += 1;
                (n_split - 1) % size
            }
            Ordering::Greater => parents[i].map_or(0, |p| owners[p]),
        };
    }

    // Local indices follow global numbering on each rank
    let mut counters = vec![0usize; size as usize];
    let indices = owners
        .iter()
        .map(|&owner| {
            let index = NodeIndex::new(owner, counters[owner as usize]);
            counters[owner as usize] += 1;
            index
        })
        .collect_vec();

    let mut all_nodes = (0..n_nodes)
        .map(|i| {
            TreeNode::new(
                indices[i],
                parents[i].map(|p| indices[p]),
                levels[i],
                payload,
            )
        })
        .collect_vec();

    for (i, parent) in parents.iter().enumerate() {
        if let Some(p) = *parent {
            all_nodes[p].add_child(indices[i]);
        }
    }

    let mut ghost_ids = Vec::new();
    for (i, parent) in parents.iter().enumerate() {
        if owners[i] != rank {
            continue;
        }
        if let Some(p) = *parent {
            if owners[p] != rank {
                ghost_ids.push(p);
            }
        }
    }
    for (i, parent) in parents.iter().enumerate() {
        if let Some(p) = *parent {
            if owners[p] == rank && owners[i] != rank {
                ghost_ids.push(i);
            }
        }
    }

    let ghosts = ghost_ids
        .into_iter()
        .sorted()
        .dedup()
        .map(|i| all_nodes[i].clone())
        .collect_vec();

    let nodes = all_nodes
        .into_iter()
        .zip(owners.iter())
        .filter(|(_, owner)| **owner == rank)
        .map(|(node, _)| node)
        .collect_vec();

    // Keys are unique by construction
    match Graph::new(rank, nodes, ghosts) {
        Ok(graph) => graph,
        Err(e) => panic!("{e}"),
    }
}

/// Parent pointers of a complete tree in breadth first order.
///
/// # Arguments
/// * `depth` - Depth of the tree, a single root has depth 0.
/// * `branching` - Number of children of each non-leaf node.
pub fn complete_tree_parents(depth: u64, branching: usize) -> Vec<Option<usize>> {
    let n_nodes: usize = (0..=depth).map(|l| branching.pow(l as u32)).sum();
    (0..n_nodes)
        .map(|i| if i == 0 { None } else { Some((i - 1) / branching) })
        .collect_vec()
}

/// Parent pointers of a random recursive tree, each node's parent drawn uniformly from the nodes
/// before it.
///
/// # Arguments
/// * `n_nodes` - Number of nodes, at least one.
/// * `seed` - Seed of the random number generator.
pub fn random_tree_parents(n_nodes: usize, seed: u64) -> Vec<Option<usize>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_nodes.max(1))
        .map(|i| if i == 0 { None } else { Some(rng.gen_range(0..i)) })
        .collect_vec()
}

/// Partition of a complete tree distributed over `size` ranks, subtrees below level 1 are whole
/// on one rank.
///
/// # Arguments
/// * `depth` - Depth of the tree.
/// * `branching` - Number of children of each non-leaf node.
/// * `size` - Number of ranks.
/// * `rank` - Rank whose partition is returned.
/// * `payload` - Initial payload of every node.
pub fn partitioned_tree_fixture(
    depth: u64,
    branching: usize,
    size: i32,
    rank: i32,
    payload: f64,
) -> Graph<TreeNode<f64>> {
    split_tree_fixture(depth, branching, 1, size, rank, payload)
}

/// Partition of a complete tree distributed over `size` ranks at `split_level`.
///
/// # Arguments
/// * `depth` - Depth of the tree.
/// * `branching` - Number of children of each non-leaf node.
/// * `split_level` - Level whose nodes are dealt out to ranks.
/// * `size` - Number of ranks.
/// * `rank` - Rank whose partition is returned.
/// * `payload` - Initial payload of every node.
pub fn split_tree_fixture(
    depth: u64,
    branching: usize,
    split_level: u64,
    size: i32,
    rank: i32,
    payload: f64,
) -> Graph<TreeNode<f64>> {
    let parents = complete_tree_parents(depth, branching);
    partition_tree(&parents, split_level, size, rank, payload)
}

/// Partition of a random recursive tree distributed over `size` ranks.
///
/// # Arguments
/// * `n_nodes` - Number of nodes in the global tree.
/// * `seed` - Seed of the random number generator.
/// * `size` - Number of ranks.
/// * `rank` - Rank whose partition is returned.
pub fn random_tree_fixture(
    n_nodes: usize,
    seed: u64,
    size: i32,
    rank: i32,
) -> Graph<TreeNode<f64>> {
    partition_tree(&random_tree_parents(n_nodes, seed), 1, size, rank, 1.0)
}

/// Four node tree on a single rank: `A` is the root with children `B` and `C`, `D` is a child of
/// `C`. Payloads are 1, 2, 3 and 4 in that order.
pub fn scenario_tree() -> Graph<TreeNode<f64>> {
    let parents = [None, Some(0), Some(0), Some(2)];
    let mut graph = partition_tree(&parents, 1, 1, 0, 0.0);
    for (i, node) in graph.nodes.iter_mut().enumerate() {
        node.payload = (i + 1) as f64;
    }
    graph
}

/// Partition of `n_nodes` unconnected roots.
///
/// # Arguments
/// * `n_nodes` - Number of nodes.
/// * `rank` - Rank owning the nodes.
/// * `payload` - Initial payload of every node.
pub fn flat_fixture(n_nodes: usize, rank: i32, payload: f64) -> Graph<TreeNode<f64>> {
    let nodes = (0..n_nodes)
        .map(|i| TreeNode::new(NodeIndex::new(rank, i), None, 0, payload))
        .collect_vec();

    // Keys are unique by construction
    match Graph::new(rank, nodes, Vec::new()) {
        Ok(graph) => graph,
        Err(e) => panic!("{e}"),
    }
}

#[cfg(test)]
mod test {
    use crate::traits::graph::GraphNode;

    use super::*;

    #[test]
    fn test_complete_tree_parents() {
        let parents = complete_tree_parents(2, 3);
        assert_eq!(parents.len(), 13);
        assert_eq!(parents[0], None);
        assert_eq!(parents[3], Some(0));
        assert_eq!(parents[4], Some(1));
        assert_eq!(parents[12], Some(3));
    }

    #[test]
    fn test_random_tree_parents() {
        let a = random_tree_parents(100, 0);
        let b = random_tree_parents(100, 0);
        assert_eq!(a, b);
        assert!(a.iter().enumerate().skip(1).all(|(i, p)| p.unwrap() < i));
    }

    #[test]
    fn test_partition_covers_tree() {
        let depth = 3;
        let branching = 2;
        let size = 3;

        let mut n_local = 0;
        for rank in 0..size {
            let graph = partitioned_tree_fixture(depth, branching, size, rank, 1.0);
            n_local += graph.len();

            assert!(graph.iter().all(|node| node.index.rank == rank));

            if rank == 0 {
                assert!(graph.nodes()[0].is_root());
            } else {
                assert!(graph.iter().all(|node| !node.is_root()));
            }
        }
        assert_eq!(n_local, 15);
    }

    #[test]
    fn test_split_below_level_one() {
        let depth = 3;
        let branching = 2;
        let size = 3;

        let mut n_local = 0;
        for rank in 0..size {
            let graph = split_tree_fixture(depth, branching, 2, size, rank, 1.0);
            n_local += graph.len();

            if rank == 0 {
                assert_eq!(graph.iter().filter(|n| n.level < 2).count(), 3);
            } else {
                assert!(graph.iter().all(|n| n.level >= 2));
            }

            // Level 2 nodes off rank 0 hang from a ghost parent
            for node in graph.iter().filter(|n| n.level == 2 && rank != 0) {
                let parent = node.parent.unwrap();
                assert_ne!(parent.rank, rank);
                assert!(graph.ghosts().iter().any(|g| g.index == parent));
            }
        }
        assert_eq!(n_local, 15);
    }

    #[test]
    fn test_scenario_tree() {
        let graph = scenario_tree();
        let nodes = graph.nodes();

        assert!(nodes[0].is_root());
        assert!(nodes[1].is_leaf());
        assert!(nodes[3].is_leaf());
        assert!(nodes[2].is_parent(&nodes[3]));
        assert!(nodes[0].is_parent(&nodes[1]));
        assert_eq!(nodes[0].n_children(), 2);
        assert!(graph.ghosts().is_empty());
    }
}
