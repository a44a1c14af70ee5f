//! # Partitioned Graphs
//!
//! Each process owns a `Graph`, its partition of a distributed graph. Nodes are stored in a stable
//! order that is used to index interaction sets, alongside read-only ghost nodes which stand in for
//! nodes owned by other processes.
pub mod types;

pub mod helpers;
mod node;
mod partition;
