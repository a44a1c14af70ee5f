//! Implementation of tree nodes.
use std::fmt;

use bytemuck::Pod;

use crate::traits::graph::GraphNode;

use super::types::{NodeIndex, TreeNode};

impl NodeIndex {
    /// Constructor
    pub fn new(rank: i32, index: usize) -> Self {
        Self { rank, index }
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rank, self.index)
    }
}

impl<T> TreeNode<T> {
    /// Constructor for a node without children, these are added with `add_child`.
    ///
    /// # Arguments
    /// * `index` - Identity of the node.
    /// * `parent` - Identity of the parent, `None` for the global root.
    /// * `level` - Distance from the global root.
    /// * `payload` - Initial payload.
    pub fn new(index: NodeIndex, parent: Option<NodeIndex>, level: u64, payload: T) -> Self {
        Self {
            index,
            parent,
            children: Vec::new(),
            level,
            payload,
        }
    }

    /// Register a child of this node.
    pub fn add_child(&mut self, child: NodeIndex) {
        self.children.push(child)
    }
}

impl<T> GraphNode for TreeNode<T>
where
    T: Pod + Send + Sync,
{
    type Key = NodeIndex;
    type Payload = T;

    fn key(&self) -> Self::Key {
        self.index
    }

    fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn is_parent(&self, other: &Self) -> bool {
        other.parent == Some(self.index)
    }

    fn is_child(&self, other: &Self) -> bool {
        self.parent == Some(other.index)
    }

    fn n_children(&self) -> usize {
        self.children.len()
    }

    fn level(&self) -> u64 {
        self.level
    }

    fn payload(&self) -> T {
        self.payload
    }

    fn set_payload(&mut self, payload: T) {
        self.payload = payload
    }

    fn pack_key(key: &NodeIndex) -> [u64; 2] {
        [key.rank as u64, key.index as u64]
    }
}
