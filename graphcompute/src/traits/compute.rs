//! Contracts supplied by callers, and the interface of executors.
use crate::graph::types::{Graph, InteractionSets};

use super::{
    graph::GraphNode,
    transport::Transport,
    types::{AlgorithmChoice, CombineReport, GraphError},
};

/// Interface for the per-node generate function.
///
/// Generate functions are called on every local node, potentially from several threads at once,
/// and must not depend on the order in which nodes are visited.
pub trait Generate<N>
where
    Self: Sync,
    N: GraphNode,
{
    /// Append the interaction set of `node` to `sink`, returning the dependency flag of the node.
    ///
    /// # Arguments
    /// * `graph` - Local partition containing `node`.
    /// * `node` - Node whose interaction set is generated.
    /// * `sink` - Output, nodes are appended in interaction order.
    fn generate(&self, graph: &Graph<N>, node: &N, sink: &mut Vec<N>) -> bool;

    /// Generation mode declared for `node`, `General` when nothing is known in advance.
    ///
    /// # Arguments
    /// * `node` - Node whose interaction set is generated.
    fn mode(&self, _node: &N) -> AlgorithmChoice {
        AlgorithmChoice::General
    }
}

impl<N, F> Generate<N> for F
where
    N: GraphNode,
    F: Fn(&Graph<N>, &N, &mut Vec<N>) -> bool + Sync,
{
    fn generate(&self, graph: &Graph<N>, node: &N, sink: &mut Vec<N>) -> bool {
        self(graph, node, sink)
    }
}

/// Interface for the pairwise combine function.
pub trait Combine<N>
where
    N: GraphNode,
{
    /// Update the payload of `target` from `source`, returning whether the update was accepted.
    ///
    /// # Arguments
    /// * `target` - Node being updated.
    /// * `source` - Node from `target`'s interaction set.
    fn combine(&self, target: &mut N, source: &N) -> bool;
}

impl<N, F> Combine<N> for F
where
    N: GraphNode,
    F: Fn(&mut N, &N) -> bool,
{
    fn combine(&self, target: &mut N, source: &N) -> bool {
        self(target, source)
    }
}

/// Interface for an executor implementing one combine case.
pub trait Executor<N, T>
where
    N: GraphNode,
    T: Transport,
{
    /// The combine case implemented by this executor.
    fn algorithm(&self) -> AlgorithmChoice;

    /// Estimated cost of running this executor, in units of combine calls.
    ///
    /// # Arguments
    /// * `graph` - Local partition.
    /// * `interaction_sets` - Interaction sets of the local partition.
    fn score(&self, graph: &Graph<N>, interaction_sets: &InteractionSets<N>) -> f32;

    /// Apply `combine` over the local partition.
    ///
    /// Executors may use collective operations, every process runs the same executor.
    ///
    /// # Arguments
    /// * `graph` - Local partition, payloads are updated in place.
    /// * `combine` - User supplied combine function.
    /// * `interaction_sets` - Interaction sets of the local partition.
    /// * `transport` - Collective operations of the process group.
    fn execute(
        &self,
        graph: &mut Graph<N>,
        combine: &dyn Combine<N>,
        interaction_sets: &InteractionSets<N>,
        transport: &T,
    ) -> Result<CombineReport, GraphError>;
}
