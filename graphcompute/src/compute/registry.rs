//! Registry of executors, keyed by the combine case they implement.
use std::collections::HashMap;

use itertools::Itertools;

use crate::traits::{
    compute::Executor,
    graph::GraphNode,
    transport::Transport,
    types::{AlgorithmChoice, GraphError},
};

use super::{
    executors::{
        DownwardAccumulateSpecial, LocalComputation, NoDependency, UpwardAccumulateSpecial,
    },
    types::AlgorithmRegistry,
};

impl<N, T> AlgorithmRegistry<N, T>
where
    N: GraphNode,
    T: Transport,
{
    /// Registry without any executors.
    pub fn new() -> Self {
        Self {
            executors: HashMap::new(),
        }
    }

    /// Registry holding the built-in executors.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(LocalComputation));
        registry.register(Box::new(NoDependency));
        registry.register(Box::new(UpwardAccumulateSpecial));
        registry.register(Box::new(DownwardAccumulateSpecial));
        registry
    }

    /// Register an executor for the case it implements, returning the executor it replaces.
    ///
    /// # Arguments
    /// * `executor` - Executor to register.
    pub fn register(
        &mut self,
        executor: Box<dyn Executor<N, T>>,
    ) -> Option<Box<dyn Executor<N, T>>> {
        self.executors.insert(executor.algorithm(), executor)
    }

    /// Remove and return the executor registered for a case.
    ///
    /// # Arguments
    /// * `algorithm` - Case being unregistered.
    pub fn unregister(&mut self, algorithm: AlgorithmChoice) -> Option<Box<dyn Executor<N, T>>> {
        self.executors.remove(&algorithm)
    }

    /// Find the executor for a case.
    ///
    /// Cases without a built-in implementation fail with `Unsupported` unless an executor has been
    /// registered for them, built-in cases that have been unregistered fail with `NotFound`.
    ///
    /// # Arguments
    /// * `algorithm` - Case being looked up.
    pub fn lookup(&self, algorithm: AlgorithmChoice) -> Result<&dyn Executor<N, T>, GraphError> {
        match self.executors.get(&algorithm) {
            Some(executor) => Ok(executor.as_ref()),
            None if algorithm.is_implemented() => Err(GraphError::NotFound(algorithm)),
            None => Err(GraphError::Unsupported(algorithm)),
        }
    }

    /// Whether an executor is registered for a case.
    pub fn contains(&self, algorithm: AlgorithmChoice) -> bool {
        self.executors.contains_key(&algorithm)
    }

    /// Cases with a registered executor, in tag order.
    pub fn algorithms(&self) -> Vec<AlgorithmChoice> {
        self.executors.keys().copied().sorted().collect_vec()
    }
}

impl<N, T> Default for AlgorithmRegistry<N, T>
where
    N: GraphNode,
    T: Transport,
{
    fn default() -> Self {
        Self::with_defaults()
    }
}
