//! Implementation of the local partition of a graph.
use std::{collections::BTreeMap, ops::Index};

use itertools::Itertools;

use crate::traits::{graph::GraphNode, types::GraphError};

use super::types::{Graph, InteractionSets};

impl<N> Graph<N>
where
    N: GraphNode,
{
    /// Construct a partition from its local nodes, in traversal order, and ghost nodes.
    ///
    /// # Arguments
    /// * `rank` - Rank of the owning process.
    /// * `nodes` - Local nodes, their order is kept for the lifetime of the graph.
    /// * `ghosts` - Surrogates for remote nodes referenced by local nodes.
    pub fn new(rank: i32, nodes: Vec<N>, ghosts: Vec<N>) -> Result<Self, GraphError> {
        let duplicates = nodes
            .iter()
            .chain(ghosts.iter())
            .map(|node| node.key())
            .duplicates()
            .collect_vec();

        if !duplicates.is_empty() {
            return Err(GraphError::Inconsistency(format!(
                "duplicate node keys in partition of rank {}: {:?}",
                rank, duplicates
            )));
        }

        let key_to_index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.key(), i))
            .collect();

        let key_to_ghost_index = ghosts
            .iter()
            .enumerate()
            .map(|(i, node)| (node.key(), i))
            .collect();

        Ok(Self {
            rank,
            nodes,
            ghosts,
            key_to_index,
            key_to_ghost_index,
        })
    }

    /// Number of local nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the partition has no local nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Local nodes, in traversal order
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Ghost nodes
    pub fn ghosts(&self) -> &[N] {
        &self.ghosts
    }

    /// Iterate over local nodes in traversal order
    pub fn iter(&self) -> std::slice::Iter<'_, N> {
        self.nodes.iter()
    }

    /// Local node at a given position.
    ///
    /// # Arguments
    /// * `idx` - Position in traversal order.
    pub fn node(&self, idx: usize) -> Option<&N> {
        self.nodes.get(idx)
    }

    /// Mutable access to a local node, for updating its payload.
    ///
    /// # Arguments
    /// * `idx` - Position in traversal order.
    pub fn node_mut(&mut self, idx: usize) -> Option<&mut N> {
        self.nodes.get_mut(idx)
    }

    /// Map from a key to the position of a local node.
    ///
    /// # Arguments
    /// * `key` - Key being queried.
    pub fn index(&self, key: &N::Key) -> Option<&usize> {
        self.key_to_index.get(key)
    }

    /// Look up a node by key, local nodes first and then ghosts.
    ///
    /// # Arguments
    /// * `key` - Key being queried.
    pub fn lookup(&self, key: &N::Key) -> Option<&N> {
        if let Some(&idx) = self.key_to_index.get(key) {
            Some(&self.nodes[idx])
        } else {
            self.key_to_ghost_index
                .get(key)
                .map(|&idx| &self.ghosts[idx])
        }
    }

    /// Deepest level of the local nodes, `None` for an empty partition.
    pub fn depth(&self) -> Option<u64> {
        self.nodes.iter().map(|node| node.level()).max()
    }

    /// Positions of local nodes grouped by level, each group in traversal order.
    pub fn level_indices(&self) -> BTreeMap<u64, Vec<usize>> {
        let mut levels = BTreeMap::new();
        for (i, node) in self.nodes.iter().enumerate() {
            levels.entry(node.level()).or_insert_with(Vec::new).push(i);
        }
        levels
    }
}

impl<N> InteractionSets<N>
where
    N: GraphNode,
{
    /// Wrap one interaction set per local node.
    pub fn new(sets: Vec<Vec<N>>) -> Self {
        Self { sets }
    }

    /// Number of interaction sets
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether there are no interaction sets
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Iterate over interaction sets in traversal order
    pub fn iter(&self) -> std::slice::Iter<'_, Vec<N>> {
        self.sets.iter()
    }

    /// Total number of entries over all interaction sets
    pub fn n_interactions(&self) -> usize {
        self.sets.iter().map(|set| set.len()).sum()
    }

    /// Whether every node's interaction set is exactly the node itself.
    ///
    /// # Arguments
    /// * `graph` - Partition the interaction sets were generated from.
    pub fn is_self_only(&self, graph: &Graph<N>) -> bool {
        self.sets.len() == graph.len()
            && graph
                .iter()
                .zip(self.sets.iter())
                .all(|(node, set)| set.len() == 1 && set[0].key() == node.key())
    }
}

impl<N> Index<usize> for InteractionSets<N> {
    type Output = Vec<N>;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.sets[idx]
    }
}

#[cfg(test)]
mod test {
    use crate::graph::{
        helpers::{partitioned_tree_fixture, scenario_tree},
        types::{NodeIndex, TreeNode},
    };

    use super::*;

    #[test]
    fn test_duplicate_keys() {
        let node = TreeNode::<f64> {
            index: NodeIndex { rank: 0, index: 0 },
            ..Default::default()
        };
        let graph = Graph::new(0, vec![node.clone(), node], Vec::new());
        assert!(matches!(graph, Err(GraphError::Inconsistency(_))));
    }

    #[test]
    fn test_lookup() {
        let size = 3;
        for rank in 0..size {
            let graph = partitioned_tree_fixture(3, 2, size, rank, 1.0);

            for (i, node) in graph.iter().enumerate() {
                assert_eq!(graph.index(&node.index), Some(&i));
                assert_eq!(graph.lookup(&node.index), Some(node));

                // Every referenced node is reachable locally
                if let Some(parent) = node.parent {
                    assert!(graph.lookup(&parent).is_some());
                }
                for child in node.children.iter() {
                    assert!(graph.lookup(child).is_some());
                }
            }

            for ghost in graph.ghosts() {
                assert!(graph.index(&ghost.index).is_none());
                assert_ne!(ghost.index.rank, rank);
            }
        }
    }

    #[test]
    fn test_level_indices() {
        let graph = scenario_tree();
        let levels = graph.level_indices();

        assert_eq!(graph.depth(), Some(2));
        assert_eq!(levels[&0], vec![0]);
        assert_eq!(levels[&1], vec![1, 2]);
        assert_eq!(levels[&2], vec![3]);
    }

    #[test]
    fn test_self_only() {
        let graph = scenario_tree();
        let sets = InteractionSets::new(graph.iter().map(|n| vec![n.clone()]).collect());
        assert!(sets.is_self_only(&graph));
        assert_eq!(sets.n_interactions(), 4);

        let mut sets = sets;
        sets.sets[2] = vec![graph.nodes()[0].clone()];
        assert!(!sets.is_self_only(&graph));
    }
}
