//! Detection of the combine case from the shape of interaction sets.
use tracing::debug;

use crate::{
    graph::types::{Graph, InteractionSets},
    traits::{graph::GraphNode, types::AlgorithmChoice},
};

/// Whether every non-root node interacts with exactly its parent.
///
/// # Arguments
/// * `graph` - Local partition.
/// * `interaction_sets` - Interaction sets of the local partition.
pub fn is_downward_special<N>(graph: &Graph<N>, interaction_sets: &InteractionSets<N>) -> bool
where
    N: GraphNode,
{
    graph
        .iter()
        .zip(interaction_sets.iter())
        .filter(|(node, _)| !node.is_root())
        .all(|(node, set)| set.len() == 1 && set[0].is_parent(node))
}

/// Whether every non-leaf node interacts with exactly its children.
///
/// # Arguments
/// * `graph` - Local partition.
/// * `interaction_sets` - Interaction sets of the local partition.
pub fn is_upward_special<N>(graph: &Graph<N>, interaction_sets: &InteractionSets<N>) -> bool
where
    N: GraphNode,
{
    graph
        .iter()
        .zip(interaction_sets.iter())
        .filter(|(node, _)| !node.is_leaf())
        .all(|(node, set)| {
            set.len() == node.n_children() && set.iter().all(|other| other.is_child(node))
        })
}

/// Classify the local partition into a combine case.
///
/// Without dependencies every interaction set is already resolved, so the case is
/// `LocalComputation` or `NoDependency`. With dependencies, a declared special mode is honoured,
/// otherwise the downward and then the upward special shapes are tested, falling back to `General`.
///
/// # Arguments
/// * `graph` - Local partition.
/// * `mode` - Generation mode, declared or inferred.
/// * `interaction_sets` - Interaction sets of the local partition.
/// * `dependency` - Dependency flag shared by all local nodes.
pub fn classify<N>(
    graph: &Graph<N>,
    mode: AlgorithmChoice,
    interaction_sets: &InteractionSets<N>,
    dependency: bool,
) -> AlgorithmChoice
where
    N: GraphNode,
{
    let combine_case = if !dependency {
        if mode == AlgorithmChoice::LocalComputation {
            AlgorithmChoice::LocalComputation
        } else {
            AlgorithmChoice::NoDependency
        }
    } else {
        match mode {
            AlgorithmChoice::LocalComputation
            | AlgorithmChoice::UpwardAccumulateSpecial
            | AlgorithmChoice::DownwardAccumulateSpecial => mode,
            _ => {
                if is_downward_special(graph, interaction_sets) {
                    AlgorithmChoice::DownwardAccumulateSpecial
                } else if is_upward_special(graph, interaction_sets) {
                    AlgorithmChoice::UpwardAccumulateSpecial
                } else {
                    AlgorithmChoice::General
                }
            }
        }
    };

    debug!(rank = graph.rank, %mode, dependency, %combine_case, "classified partition");

    combine_case
}

#[cfg(test)]
mod test {
    use crate::{
        compute::{
            generators::{ChildrenInteraction, ParentInteraction, SelfInteraction},
            interaction::generate_all,
        },
        graph::{
            helpers::{flat_fixture, partitioned_tree_fixture, random_tree_fixture, scenario_tree},
            types::TreeNode,
        },
        traits::compute::Generate,
    };

    use super::*;

    fn classify_with<G: Generate<TreeNode<f64>>>(
        graph: &Graph<TreeNode<f64>>,
        generate: &G,
    ) -> AlgorithmChoice {
        let interactions = generate_all(graph, generate).unwrap();
        classify(
            graph,
            interactions.mode,
            &interactions.interaction_sets,
            interactions.dependency,
        )
    }

    #[test]
    fn test_local_computation_any_dependency() {
        for graph in [flat_fixture(3, 0, 1.0), scenario_tree(), random_tree_fixture(50, 1, 1, 0)] {
            for dependency in [true, false] {
                let case = classify_with(&graph, &SelfInteraction::new(dependency));
                assert_eq!(case, AlgorithmChoice::LocalComputation);
            }
        }
    }

    #[test]
    fn test_no_dependency() {
        let graph = scenario_tree();
        let generate = |g: &Graph<TreeNode<f64>>,
                        _: &TreeNode<f64>,
                        sink: &mut Vec<TreeNode<f64>>|
         -> bool {
            sink.extend(g.iter().cloned());
            false
        };
        assert_eq!(classify_with(&graph, &generate), AlgorithmChoice::NoDependency);
    }

    #[test]
    fn test_downward_special() {
        let graph = scenario_tree();
        assert_eq!(
            classify_with(&graph, &ParentInteraction::new()),
            AlgorithmChoice::DownwardAccumulateSpecial
        );

        for seed in 0..5 {
            let graph = random_tree_fixture(100, seed, 1, 0);
            assert_eq!(
                classify_with(&graph, &ParentInteraction::new()),
                AlgorithmChoice::DownwardAccumulateSpecial
            );
        }
    }

    #[test]
    fn test_upward_special() {
        let graph = scenario_tree();
        assert_eq!(
            classify_with(&graph, &ChildrenInteraction::new()),
            AlgorithmChoice::UpwardAccumulateSpecial
        );

        for seed in 0..5 {
            let graph = random_tree_fixture(100, seed, 1, 0);
            assert_eq!(
                classify_with(&graph, &ChildrenInteraction::new()),
                AlgorithmChoice::UpwardAccumulateSpecial
            );
        }
    }

    #[test]
    fn test_special_shapes_on_partitions() {
        let size = 3;
        for rank in 0..size {
            let graph = partitioned_tree_fixture(3, 3, size, rank, 1.0);
            assert_eq!(
                classify_with(&graph, &ParentInteraction::new()),
                AlgorithmChoice::DownwardAccumulateSpecial
            );
            assert_eq!(
                classify_with(&graph, &ChildrenInteraction::new()),
                AlgorithmChoice::UpwardAccumulateSpecial
            );
        }
    }

    #[test]
    fn test_no_false_positive_downward() {
        let graph = scenario_tree();
        let mut interactions = generate_all(&graph, &ParentInteraction::new()).unwrap();

        // Node D additionally interacts with its grandparent
        let root = graph.nodes()[0].clone();
        interactions.interaction_sets.sets[3].push(root);

        let case = classify(
            &graph,
            interactions.mode,
            &interactions.interaction_sets,
            interactions.dependency,
        );
        assert_eq!(case, AlgorithmChoice::General);
    }

    #[test]
    fn test_no_false_positive_upward() {
        let graph = scenario_tree();
        let mut interactions = generate_all(&graph, &ChildrenInteraction::new()).unwrap();

        // The root interacts with a child and a grandchild
        let grandchild = graph.nodes()[3].clone();
        interactions.interaction_sets.sets[0][1] = grandchild;

        let case = classify(
            &graph,
            interactions.mode,
            &interactions.interaction_sets,
            interactions.dependency,
        );
        assert_eq!(case, AlgorithmChoice::General);

        // A missing child also breaks the shape
        let mut interactions = generate_all(&graph, &ChildrenInteraction::new()).unwrap();
        interactions.interaction_sets.sets[0].pop();
        let case = classify(
            &graph,
            interactions.mode,
            &interactions.interaction_sets,
            interactions.dependency,
        );
        assert_eq!(case, AlgorithmChoice::General);
    }

    #[test]
    fn test_declared_modes_are_honoured() {
        let graph = scenario_tree();
        let sets = InteractionSets::new(vec![Vec::new(); graph.len()]);

        for mode in [
            AlgorithmChoice::LocalComputation,
            AlgorithmChoice::UpwardAccumulateSpecial,
            AlgorithmChoice::DownwardAccumulateSpecial,
        ] {
            assert_eq!(classify(&graph, mode, &sets, true), mode);
        }

        // Empty sets on non-root nodes match neither special shape
        assert_eq!(
            classify(&graph, AlgorithmChoice::General, &sets, true),
            AlgorithmChoice::General
        );
        assert_eq!(
            classify(&graph, AlgorithmChoice::UpwardAccumulateSpecial, &sets, false),
            AlgorithmChoice::NoDependency
        );
    }
}
