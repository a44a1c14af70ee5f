//! Graph Traits
use std::{fmt::Debug, hash::Hash};

use bytemuck::Pod;

/// Defines a node of a partitioned graph.
///
/// Identity and structure are read-only once the partition has been built, the remaining state of
/// an implementor is its payload, which combine functions mutate in place.
pub trait GraphNode
where
    Self: Clone + Send + Sync,
{
    /// Identity of a node, unique across all partitions.
    type Key: Copy + Eq + Hash + Ord + Debug + Send + Sync;

    /// Data updated by combine functions, copied into ghosts on other processes.
    type Payload: Pod;

    /// Identity of this node
    fn key(&self) -> Self::Key;

    /// Whether this node has no parent.
    fn is_root(&self) -> bool;

    /// Whether this node has no children.
    fn is_leaf(&self) -> bool;

    /// Whether this node is the parent of `other`.
    ///
    /// # Arguments
    /// - `other` - Node being queried.
    fn is_parent(&self, other: &Self) -> bool;

    /// Whether this node is a child of `other`.
    ///
    /// # Arguments
    /// - `other` - Node being queried.
    fn is_child(&self, other: &Self) -> bool;

    /// Number of children of this node
    fn n_children(&self) -> usize;

    /// Distance from the global root, roots are at level 0.
    fn level(&self) -> u64;

    /// Current payload
    fn payload(&self) -> Self::Payload;

    /// Overwrite the payload, used to refresh ghosts from their owners.
    fn set_payload(&mut self, payload: Self::Payload);

    /// Fixed width encoding of a key, equal keys must encode equally on every process.
    ///
    /// # Arguments
    /// - `key` - Key being encoded.
    fn pack_key(key: &Self::Key) -> [u64; 2];
}
