//! Data structures for partitioned graphs.
use std::collections::HashMap;

use crate::traits::graph::GraphNode;

/// Identity of a node: the rank owning it and its index within that rank's partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex {
    /// Owning rank
    pub rank: i32,

    /// Position in the owning rank's partition
    pub index: usize,
}

/// A node of a distributed tree, carrying a payload of type `T`.
///
/// # Fields
/// - `index` - Identity of this node.
/// - `parent` - Identity of the parent, `None` for the global root.
/// - `children` - Identities of the children, possibly owned by other ranks.
/// - `level` - Distance from the global root.
/// - `payload` - Data updated by combine functions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode<T> {
    /// Identity of this node.
    pub index: NodeIndex,

    /// Identity of the parent.
    pub parent: Option<NodeIndex>,

    /// Identities of the children.
    pub children: Vec<NodeIndex>,

    /// Distance from the global root.
    pub level: u64,

    /// Data updated by combine functions.
    pub payload: T,
}

/// The partition of a distributed graph owned by one process.
///
/// # Fields
/// - `rank` - Rank of the owning process.
/// - `nodes` - Local nodes in traversal order, this order indexes interaction sets.
/// - `ghosts` - Read-only surrogates for nodes owned by other processes.
/// - `key_to_index` - Map from a node key to its position in `nodes`.
/// - `key_to_ghost_index` - Map from a node key to its position in `ghosts`.
#[derive(Debug, Clone)]
pub struct Graph<N>
where
    N: GraphNode,
{
    /// Rank of the owning process.
    pub rank: i32,

    /// Local nodes in traversal order.
    pub(crate) nodes: Vec<N>,

    /// Surrogates for remote nodes.
    pub(crate) ghosts: Vec<N>,

    /// Position of each local node.
    pub(crate) key_to_index: HashMap<N::Key, usize>,

    /// Position of each ghost node.
    pub(crate) key_to_ghost_index: HashMap<N::Key, usize>,
}

/// Interaction sets of a local partition, `interaction_sets[i]` belongs to the i-th local node.
#[derive(Debug, Clone, Default)]
pub struct InteractionSets<N> {
    /// One ordered set per local node.
    pub(crate) sets: Vec<Vec<N>>,
}
