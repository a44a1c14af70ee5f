//! Builder objects to construct graph computations.
use crate::traits::{
    compute::Executor, graph::GraphNode, transport::Transport, types::GraphError,
};

use super::types::{AlgorithmRegistry, GraphCompute, GraphComputeBuilder};

impl<N, T> GraphComputeBuilder<N, T>
where
    N: GraphNode,
    T: Transport,
{
    /// Initialise an empty builder
    pub fn new() -> Self {
        Self {
            transport: None,
            registry: None,
            executors: Vec::new(),
            report_rank: None,
        }
    }

    /// Set the transport connecting the processes of the group.
    ///
    /// # Arguments
    /// * `transport` - Collective operations of the process group.
    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the built-in executors with a custom registry.
    ///
    /// # Arguments
    /// * `registry` - Executors available for dispatch.
    pub fn registry(mut self, registry: AlgorithmRegistry<N, T>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Register an additional executor, replacing any executor for the same case.
    ///
    /// # Arguments
    /// * `executor` - Executor to register.
    pub fn executor(mut self, executor: Box<dyn Executor<N, T>>) -> Self {
        self.executors.push(executor);
        self
    }

    /// Choose the rank reporting progress and timings, rank 0 by default.
    ///
    /// # Arguments
    /// * `rank` - Reporting rank.
    pub fn report_rank(mut self, rank: i32) -> Self {
        self.report_rank = Some(rank);
        self
    }

    /// Finalize and build the graph computation.
    pub fn build(self) -> Result<GraphCompute<N, T>, GraphError> {
        let Some(transport) = self.transport else {
            return Err(GraphError::Config("must set a transport".to_string()));
        };

        let report_rank = self.report_rank.unwrap_or(0);
        if report_rank < 0 || report_rank >= transport.size() {
            return Err(GraphError::Config(format!(
                "report rank {} outside of group of size {}",
                report_rank,
                transport.size()
            )));
        }

        let mut registry = self.registry.unwrap_or_default();
        for executor in self.executors {
            registry.register(executor);
        }

        Ok(GraphCompute {
            transport,
            registry,
            report_rank,
            times: Vec::new(),
            combine_case: None,
        })
    }
}

impl<N, T> Default for GraphComputeBuilder<N, T>
where
    N: GraphNode,
    T: Transport,
{
    fn default() -> Self {
        Self::new()
    }
}
