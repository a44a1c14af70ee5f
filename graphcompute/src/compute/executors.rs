//! Built-in executors.
//!
//! The sweeps process one tree level at a time across all processes: the deepest level of any
//! partition is agreed first, then every process walks the same sequence of levels. After each
//! level the payloads of nodes mirrored elsewhere are sent to their ghosts, so that the next level
//! reads final values whether its entries are local or remote. Interaction set entries are
//! resolved to the current local node or ghost, and used as generated only when neither exists.
use tracing::debug;

use crate::{
    graph::types::{Graph, InteractionSets},
    traits::{
        compute::{Combine, Executor},
        graph::GraphNode,
        transport::Transport,
        types::{AlgorithmChoice, CombineReport, GraphError},
    },
};

use super::exchange::GhostExchange;

/// Each node combines with itself, no communication.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalComputation;

/// Each node combines with every entry of its interaction set, no communication.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDependency;

/// Leaf to root sweep, each non-leaf node combines with its children once they are final.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpwardAccumulateSpecial;

/// Root to leaf sweep, each non-root node combines with its parent once it is final.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownwardAccumulateSpecial;

/// Current state of an interaction set entry: the local node or ghost with its key, else the entry.
fn resolve<N>(graph: &Graph<N>, entry: &N) -> N
where
    N: GraphNode,
{
    graph
        .lookup(&entry.key())
        .cloned()
        .unwrap_or_else(|| entry.clone())
}

/// Deepest level over all partitions, `None` if every partition is empty.
fn global_depth<N, T>(graph: &Graph<N>, transport: &T) -> Option<u64>
where
    N: GraphNode,
    T: Transport,
{
    let local = graph.depth().map(|depth| depth + 1).unwrap_or(0);
    transport
        .all_gather(local)
        .into_iter()
        .max()
        .and_then(|depth| depth.checked_sub(1))
}

impl<N, T> Executor<N, T> for LocalComputation
where
    N: GraphNode,
    T: Transport,
{
    fn algorithm(&self) -> AlgorithmChoice {
        AlgorithmChoice::LocalComputation
    }

    fn score(&self, graph: &Graph<N>, _interaction_sets: &InteractionSets<N>) -> f32 {
        graph.len() as f32
    }

    fn execute(
        &self,
        graph: &mut Graph<N>,
        combine: &dyn Combine<N>,
        _interaction_sets: &InteractionSets<N>,
        _transport: &T,
    ) -> Result<CombineReport, GraphError> {
        let mut report = CombineReport::default();
        for node in graph.nodes.iter_mut() {
            let source = node.clone();
            report.record(combine.combine(node, &source));
        }
        Ok(report)
    }
}

impl<N, T> Executor<N, T> for NoDependency
where
    N: GraphNode,
    T: Transport,
{
    fn algorithm(&self) -> AlgorithmChoice {
        AlgorithmChoice::NoDependency
    }

    fn score(&self, _graph: &Graph<N>, interaction_sets: &InteractionSets<N>) -> f32 {
        interaction_sets.n_interactions() as f32
    }

    fn execute(
        &self,
        graph: &mut Graph<N>,
        combine: &dyn Combine<N>,
        interaction_sets: &InteractionSets<N>,
        _transport: &T,
    ) -> Result<CombineReport, GraphError> {
        let mut report = CombineReport::default();
        for (node, set) in graph.nodes.iter_mut().zip(interaction_sets.iter()) {
            for source in set.iter() {
                report.record(combine.combine(node, source));
            }
        }
        Ok(report)
    }
}

impl<N, T> Executor<N, T> for UpwardAccumulateSpecial
where
    N: GraphNode,
    T: Transport,
{
    fn algorithm(&self) -> AlgorithmChoice {
        AlgorithmChoice::UpwardAccumulateSpecial
    }

    fn score(&self, graph: &Graph<N>, interaction_sets: &InteractionSets<N>) -> f32 {
        (interaction_sets.n_interactions() + graph.level_indices().len()) as f32
    }

    fn execute(
        &self,
        graph: &mut Graph<N>,
        combine: &dyn Combine<N>,
        interaction_sets: &InteractionSets<N>,
        transport: &T,
    ) -> Result<CombineReport, GraphError> {
        let mut report = CombineReport::default();
        let levels = graph.level_indices();

        let Some(depth) = global_depth(graph, transport) else {
            return Ok(report);
        };

        let exchange = GhostExchange::new(graph, transport);
        let mut failure = None;

        for level in (0..=depth).rev() {
            if let Some(indices) = levels.get(&level) {
                for &i in indices.iter() {
                    if graph.nodes[i].is_leaf() {
                        continue;
                    }
                    for child in interaction_sets[i].iter() {
                        let source = resolve(graph, child);
                        report.record(combine.combine(&mut graph.nodes[i], &source));
                    }
                }
            }

            // Parents on the next level read these values
            match exchange.refresh(graph, level, transport) {
                Ok(n_updated) => debug!(
                    rank = transport.rank(),
                    level,
                    n_updated,
                    "upward sweep level complete"
                ),
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }

        failure.map_or(Ok(report), Err)
    }
}

impl<N, T> Executor<N, T> for DownwardAccumulateSpecial
where
    N: GraphNode,
    T: Transport,
{
    fn algorithm(&self) -> AlgorithmChoice {
        AlgorithmChoice::DownwardAccumulateSpecial
    }

    fn score(&self, graph: &Graph<N>, interaction_sets: &InteractionSets<N>) -> f32 {
        (interaction_sets.n_interactions() + graph.level_indices().len()) as f32
    }

    fn execute(
        &self,
        graph: &mut Graph<N>,
        combine: &dyn Combine<N>,
        interaction_sets: &InteractionSets<N>,
        transport: &T,
    ) -> Result<CombineReport, GraphError> {
        let mut report = CombineReport::default();
        let levels = graph.level_indices();

        let Some(depth) = global_depth(graph, transport) else {
            return Ok(report);
        };

        let exchange = GhostExchange::new(graph, transport);
        let mut failure = None;

        for level in 0..=depth {
            if let Some(indices) = levels.get(&level) {
                for &i in indices.iter() {
                    if graph.nodes[i].is_root() {
                        continue;
                    }
                    for parent in interaction_sets[i].iter() {
                        let source = resolve(graph, parent);
                        report.record(combine.combine(&mut graph.nodes[i], &source));
                    }
                }
            }

            // Children on the next level read these values
            match exchange.refresh(graph, level, transport) {
                Ok(n_updated) => debug!(
                    rank = transport.rank(),
                    level,
                    n_updated,
                    "downward sweep level complete"
                ),
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }

        failure.map_or(Ok(report), Err)
    }
}
