//! Common generate functions over trees.
use bytemuck::Pod;

use crate::{
    graph::types::{Graph, TreeNode},
    traits::{compute::Generate, types::AlgorithmChoice},
};

/// Each node interacts only with itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfInteraction {
    /// Dependency flag reported for every node.
    pub dependency: bool,
}

impl SelfInteraction {
    /// Constructor
    pub fn new(dependency: bool) -> Self {
        Self { dependency }
    }
}

impl<T> Generate<TreeNode<T>> for SelfInteraction
where
    T: Pod + Send + Sync,
{
    fn generate(
        &self,
        _graph: &Graph<TreeNode<T>>,
        node: &TreeNode<T>,
        sink: &mut Vec<TreeNode<T>>,
    ) -> bool {
        sink.push(node.clone());
        self.dependency
    }
}

/// Each non-root node interacts with its parent, roots have empty interaction sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentInteraction {
    /// Whether to declare `DownwardAccumulateSpecial` rather than leave it to detection.
    pub declare: bool,
}

impl ParentInteraction {
    /// Generator whose mode is detected from its output.
    pub fn new() -> Self {
        Self { declare: false }
    }

    /// Generator declaring `DownwardAccumulateSpecial`.
    pub fn declared() -> Self {
        Self { declare: true }
    }
}

impl<T> Generate<TreeNode<T>> for ParentInteraction
where
    T: Pod + Send + Sync,
{
    fn generate(
        &self,
        graph: &Graph<TreeNode<T>>,
        node: &TreeNode<T>,
        sink: &mut Vec<TreeNode<T>>,
    ) -> bool {
        if let Some(parent) = node.parent.and_then(|p| graph.lookup(&p)) {
            sink.push(parent.clone());
        }
        true
    }

    fn mode(&self, _node: &TreeNode<T>) -> AlgorithmChoice {
        if self.declare {
            AlgorithmChoice::DownwardAccumulateSpecial
        } else {
            AlgorithmChoice::General
        }
    }
}

/// Each non-leaf node interacts with all of its children.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildrenInteraction {
    /// Whether to declare `UpwardAccumulateSpecial` rather than leave it to detection.
    pub declare: bool,
}

impl ChildrenInteraction {
    /// Generator whose mode is detected from its output.
    pub fn new() -> Self {
        Self { declare: false }
    }

    /// Generator declaring `UpwardAccumulateSpecial`.
    pub fn declared() -> Self {
        Self { declare: true }
    }
}

impl<T> Generate<TreeNode<T>> for ChildrenInteraction
where
    T: Pod + Send + Sync,
{
    fn generate(
        &self,
        graph: &Graph<TreeNode<T>>,
        node: &TreeNode<T>,
        sink: &mut Vec<TreeNode<T>>,
    ) -> bool {
        sink.extend(
            node.children
                .iter()
                .filter_map(|child| graph.lookup(child))
                .cloned(),
        );
        true
    }

    fn mode(&self, _node: &TreeNode<T>) -> AlgorithmChoice {
        if self.declare {
            AlgorithmChoice::UpwardAccumulateSpecial
        } else {
            AlgorithmChoice::General
        }
    }
}
