//! # Graph Computations
//!
//! A computation runs in three phases on every process of a group:
//! 1. the generate function is applied to every local node, producing interaction sets;
//! 2. the shape of the interaction sets is classified into a combine case, and the processes agree
//!    on it in a single consensus round;
//! 3. the executor registered for the agreed case applies the combine function.
//!
//! Every phase ends at a point where all processes synchronise, so that no process advances with a
//! strategy its peers have not agreed to.
mod builder;
pub mod classify;
pub mod consensus;
pub mod exchange;
pub mod executors;
pub mod generators;
pub mod interaction;
mod orchestrator;
mod registry;
pub mod types;

pub use types::{AlgorithmRegistry, GraphCompute, GraphComputeBuilder};
