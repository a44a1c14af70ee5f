//! Generation of interaction sets.
use itertools::Itertools;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::debug;

use crate::{
    graph::types::{Graph, InteractionSets},
    traits::{
        compute::Generate,
        graph::GraphNode,
        transport::Transport,
        types::{AlgorithmChoice, GraphError},
    },
};

use super::types::Interactions;

/// Apply `generate` to every local node, in parallel over nodes.
///
/// All local nodes must report the same dependency flag and the same generation mode. When the mode
/// is left undetermined and every node interacts only with itself, the mode is inferred to be
/// `LocalComputation`.
///
/// # Arguments
/// * `graph` - Local partition.
/// * `generate` - User supplied generate function.
pub fn generate_all<N, G>(graph: &Graph<N>, generate: &G) -> Result<Interactions<N>, GraphError>
where
    N: GraphNode,
    G: Generate<N>,
{
    let generated = graph
        .nodes()
        .par_iter()
        .map(|node| {
            let mut sink = Vec::new();
            let dependency = generate.generate(graph, node, &mut sink);
            (dependency, generate.mode(node), sink)
        })
        .collect::<Vec<_>>();

    let (dependency, mode) = match generated.first() {
        Some(&(dependency, mode, _)) => (dependency, mode),
        None => (false, AlgorithmChoice::General),
    };

    if let Some((i, _)) = generated.iter().find_position(|(d, _, _)| *d != dependency) {
        return Err(GraphError::Inconsistency(format!(
            "dependency flags not uniform, node {:?} differs from node {:?}",
            graph.nodes()[i].key(),
            graph.nodes()[0].key()
        )));
    }

    if let Some((i, (_, m, _))) = generated.iter().find_position(|(_, m, _)| *m != mode) {
        return Err(GraphError::Inconsistency(format!(
            "generation modes not uniform, {} at node {:?} but {} at node {:?}",
            m,
            graph.nodes()[i].key(),
            mode,
            graph.nodes()[0].key()
        )));
    }

    let interaction_sets = InteractionSets::new(
        generated
            .into_iter()
            .map(|(_, _, set)| set)
            .collect_vec(),
    );

    let mode = if mode == AlgorithmChoice::General
        && !graph.is_empty()
        && interaction_sets.is_self_only(graph)
    {
        AlgorithmChoice::LocalComputation
    } else {
        mode
    };

    debug!(
        rank = graph.rank,
        n_nodes = graph.len(),
        n_interactions = interaction_sets.n_interactions(),
        dependency,
        %mode,
        "generated interaction sets"
    );

    Ok(Interactions {
        interaction_sets,
        dependency,
        mode,
    })
}

/// Generate interaction sets for the local partition, then wait for all processes to do the same.
///
/// The barrier is reached even when generation fails locally, so that peers are not left waiting.
///
/// # Arguments
/// * `graph` - Local partition.
/// * `generate` - User supplied generate function.
/// * `transport` - Collective operations of the process group.
pub fn build_all<N, G, T>(
    graph: &Graph<N>,
    generate: &G,
    transport: &T,
) -> Result<Interactions<N>, GraphError>
where
    N: GraphNode,
    G: Generate<N>,
    T: Transport,
{
    let result = generate_all(graph, generate);
    transport.barrier();
    result
}

#[cfg(test)]
mod test {
    use crate::{
        compute::generators::{ChildrenInteraction, ParentInteraction, SelfInteraction},
        graph::{
            helpers::{flat_fixture, scenario_tree},
            types::TreeNode,
        },
        transport::LocalTransport,
    };

    use super::*;

    #[test]
    fn test_sets_follow_traversal_order() {
        let graph = scenario_tree();
        let interactions = build_all(&graph, &ParentInteraction::new(), &LocalTransport).unwrap();
        let sets = &interactions.interaction_sets;

        assert_eq!(sets.len(), graph.len());
        assert!(sets[0].is_empty());
        assert_eq!(sets[1][0].index, graph.nodes()[0].index);
        assert_eq!(sets[2][0].index, graph.nodes()[0].index);
        assert_eq!(sets[3][0].index, graph.nodes()[2].index);
        assert!(interactions.dependency);
        assert_eq!(interactions.mode, AlgorithmChoice::General);
    }

    #[test]
    fn test_infer_local_computation() {
        let graph = flat_fixture(3, 0, 1.0);
        for dependency in [true, false] {
            let interactions = generate_all(&graph, &SelfInteraction::new(dependency)).unwrap();
            assert_eq!(interactions.mode, AlgorithmChoice::LocalComputation);
            assert_eq!(interactions.dependency, dependency);
        }
    }

    #[test]
    fn test_declared_mode_is_kept() {
        let graph = scenario_tree();
        let interactions = generate_all(&graph, &ChildrenInteraction::declared()).unwrap();
        assert_eq!(interactions.mode, AlgorithmChoice::UpwardAccumulateSpecial);
    }

    #[test]
    fn test_non_uniform_dependency() {
        let graph = scenario_tree();
        let generate = |_: &Graph<TreeNode<f64>>,
                        node: &TreeNode<f64>,
                        sink: &mut Vec<TreeNode<f64>>|
         -> bool {
            sink.push(node.clone());
            node.index.index % 2 == 0
        };

        let result = generate_all(&graph, &generate);
        assert!(matches!(result, Err(GraphError::Inconsistency(_))));
    }

    #[test]
    fn test_non_uniform_mode() {
        struct Mixed;

        impl Generate<TreeNode<f64>> for Mixed {
            fn generate(
                &self,
                _graph: &Graph<TreeNode<f64>>,
                node: &TreeNode<f64>,
                sink: &mut Vec<TreeNode<f64>>,
            ) -> bool {
                sink.push(node.clone());
                false
            }

            fn mode(&self, node: &TreeNode<f64>) -> AlgorithmChoice {
                if node.index.index == 3 {
                    AlgorithmChoice::NoDependency
                } else {
                    AlgorithmChoice::General
                }
            }
        }

        let graph = scenario_tree();
        match generate_all(&graph, &Mixed) {
            Err(GraphError::Inconsistency(msg)) => assert!(msg.contains("generation modes")),
            other => panic!("unexpected result {:?}", other.map(|i| i.mode)),
        }
    }

    #[test]
    fn test_empty_partition() {
        let graph = flat_fixture(0, 0, 1.0);
        let interactions = build_all(&graph, &SelfInteraction::new(true), &LocalTransport).unwrap();
        assert!(interactions.interaction_sets.is_empty());
        assert_eq!(interactions.mode, AlgorithmChoice::General);
        assert!(!interactions.dependency);
    }
}
