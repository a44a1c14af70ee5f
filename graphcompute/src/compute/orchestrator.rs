//! Top level sequencing of a graph computation.
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::{
    graph::types::Graph,
    traits::{
        compute::{Combine, Generate},
        graph::GraphNode,
        transport::Transport,
        types::{AlgorithmChoice, CombineReport, GraphError, PhaseTime, PhaseType},
    },
};

use super::{
    classify::classify,
    consensus::reach_consensus,
    interaction::build_all,
    types::{Ballot, GraphCompute, GraphComputeBuilder},
};

impl<N, T> GraphCompute<N, T>
where
    N: GraphNode,
    T: Transport,
{
    /// Graph computation with the built-in executors, reporting from rank 0.
    ///
    /// # Arguments
    /// * `transport` - Collective operations of the process group.
    pub fn new(transport: T) -> Result<Self, GraphError> {
        GraphComputeBuilder::new().transport(transport).build()
    }

    /// Phase timings of the last computation.
    pub fn times(&self) -> &[PhaseTime] {
        &self.times
    }

    /// Time of a phase of the last computation, in milliseconds.
    pub fn time(&self, phase: PhaseType) -> Option<u64> {
        self.times.iter().find(|t| t.phase == phase).map(|t| t.time)
    }

    /// Combine case agreed by the last computation, `None` if it did not reach agreement.
    pub fn combine_case(&self) -> Option<AlgorithmChoice> {
        self.combine_case
    }

    /// Run a generate/combine computation over the local partition, returning whether it succeeded.
    ///
    /// Must be called collectively by every process of the group. Failures are logged and reported
    /// as `false`, they never propagate to the caller.
    ///
    /// # Arguments
    /// * `graph` - Local partition, payloads are updated in place.
    /// * `generate` - User supplied generate function.
    /// * `combine` - User supplied combine function.
    pub fn compute<G, C>(&mut self, graph: &mut Graph<N>, generate: &G, combine: &C) -> bool
    where
        G: Generate<N>,
        C: Combine<N>,
    {
        match self.try_compute(graph, generate, combine) {
            Ok(_) => true,
            Err(e) => {
                error!(rank = self.transport.rank(), error = %e, "graph compute aborted");
                false
            }
        }
    }

    /// Run a generate/combine computation over the local partition.
    ///
    /// Must be called collectively by every process of the group. Every process reaches every
    /// synchronisation point of the computation, whether or not its own phases succeed, and all
    /// processes return an error when any of them fails before the combine phase.
    ///
    /// # Arguments
    /// * `graph` - Local partition, payloads are updated in place.
    /// * `generate` - User supplied generate function.
    /// * `combine` - User supplied combine function.
    pub fn try_compute<G, C>(
        &mut self,
        graph: &mut Graph<N>,
        generate: &G,
        combine: &C,
    ) -> Result<CombineReport, GraphError>
    where
        G: Generate<N>,
        C: Combine<N>,
    {
        let rank = self.transport.rank();
        let reporting = rank == self.report_rank;

        self.times.clear();
        self.combine_case = None;

        if reporting {
            info!("performing graph compute");
        }

        self.transport.barrier();
        let total = Instant::now();

        let s = Instant::now();
        let interactions = build_all(graph, generate, &self.transport);
        self.times.push(PhaseTime::from_instant(PhaseType::Generate, s));

        let s = Instant::now();
        let ballot = match &interactions {
            Ok(_) if graph.is_empty() => Ballot::Abstain,
            Ok(interactions) => Ballot::Agree(classify(
                graph,
                interactions.mode,
                &interactions.interaction_sets,
                interactions.dependency,
            )),
            Err(_) => Ballot::Failed,
        };
        self.transport.barrier();
        let agreed = reach_consensus(&self.transport, ballot);
        self.times.push(PhaseTime::from_instant(PhaseType::Detect, s));

        // A local failure is more informative than the aborted round it caused
        let interactions = interactions?;
        let combine_case = agreed?;
        self.combine_case = Some(combine_case);

        let s = Instant::now();
        let result = self.registry.lookup(combine_case).and_then(|executor| {
            debug!(
                rank,
                %combine_case,
                score = executor.score(graph, &interactions.interaction_sets),
                "dispatching executor"
            );
            executor.execute(graph, combine, &interactions.interaction_sets, &self.transport)
        });
        self.transport.barrier();
        self.times.push(PhaseTime::from_instant(PhaseType::Combine, s));

        let report = result?;
        if report.rejected > 0 {
            warn!(
                rank,
                rejected = report.rejected,
                calls = report.calls,
                "combine function rejected updates"
            );
        }

        self.times.push(PhaseTime::from_instant(PhaseType::Total, total));

        if reporting {
            info!(
                "done: {}ms [g: {}ms, d: {}ms, c: {}ms]",
                self.time(PhaseType::Total).unwrap_or_default(),
                self.time(PhaseType::Generate).unwrap_or_default(),
                self.time(PhaseType::Detect).unwrap_or_default(),
                self.time(PhaseType::Combine).unwrap_or_default(),
            );
        }

        Ok(report)
    }
}
