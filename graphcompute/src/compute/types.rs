//! Data structures for scheduling graph computations.
use std::collections::HashMap;

use crate::{
    graph::types::InteractionSets,
    traits::{
        compute::Executor,
        graph::GraphNode,
        transport::Transport,
        types::{AlgorithmChoice, PhaseTime},
    },
};

/// Output of the interaction set generation phase on one process.
///
/// # Fields
/// - `interaction_sets` - One interaction set per local node, in traversal order.
/// - `dependency` - Dependency flag shared by all local nodes.
/// - `mode` - Generation mode, declared by the generate function or inferred.
#[derive(Debug, Clone)]
pub struct Interactions<N> {
    /// One interaction set per local node.
    pub interaction_sets: InteractionSets<N>,

    /// Dependency flag shared by all local nodes.
    pub dependency: bool,

    /// Generation mode.
    pub mode: AlgorithmChoice,
}

/// Vote cast by one process in the consensus round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ballot {
    /// The process classified its partition into this combine case.
    Agree(AlgorithmChoice),

    /// The process has no local nodes, and accepts any case.
    Abstain,

    /// The process failed before classification.
    Failed,
}

/// Maps combine cases to the executors implementing them.
pub struct AlgorithmRegistry<N, T>
where
    N: GraphNode,
    T: Transport,
{
    /// Registered executors, at most one per case.
    pub(crate) executors: HashMap<AlgorithmChoice, Box<dyn Executor<N, T>>>,
}

/// Schedules generate/combine computations over partitioned graphs.
///
/// # Fields
/// - `transport` - Collective operations of the process group.
/// - `registry` - Executors available for dispatch.
/// - `report_rank` - Rank that reports progress and timings.
/// - `times` - Phase timings of the last computation.
/// - `combine_case` - Case agreed by the last computation that reached consensus.
pub struct GraphCompute<N, T>
where
    N: GraphNode,
    T: Transport,
{
    /// Collective operations of the process group.
    pub transport: T,

    /// Executors available for dispatch.
    pub registry: AlgorithmRegistry<N, T>,

    /// Rank that reports progress and timings.
    pub report_rank: i32,

    /// Phase timings of the last computation.
    pub times: Vec<PhaseTime>,

    /// Case agreed by the last computation.
    pub combine_case: Option<AlgorithmChoice>,
}

/// Builder for `GraphCompute` objects.
pub struct GraphComputeBuilder<N, T>
where
    N: GraphNode,
    T: Transport,
{
    /// Collective operations of the process group.
    pub transport: Option<T>,

    /// Executors available for dispatch, the built-in executors when unset.
    pub registry: Option<AlgorithmRegistry<N, T>>,

    /// Executors added on top of the registry.
    pub executors: Vec<Box<dyn Executor<N, T>>>,

    /// Rank that reports progress and timings.
    pub report_rank: Option<i32>,
}
