//! # Distributed Graph Computations
//!
//! Generate/combine computations over a graph whose nodes are partitioned across a fixed group of
//! processes, designed after the upward and downward passes of distributed tree codes.
//!
//! A computation is described by two user functions: a *generate* function, which lists the nodes
//! each node interacts with, and a *combine* function, which updates a node from one of them. From
//! the shape of the generated interaction sets the library infers which execution strategy applies,
//! checks that every process inferred the same one, and runs it:
//! * local computation, where every node only interacts with itself;
//! * computations without dependencies, where interaction sets are already resolved;
//! * upward accumulation, a leaf to root sweep where nodes interact with their children;
//! * downward accumulation, a root to leaf sweep where nodes interact with their parent.
//!
//! Processes communicate through the collective operations of the `Transport` trait. Groups of
//! threads are provided for testing, and MPI communicators are supported with the `mpi` feature.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod compute;
pub mod graph;
pub mod traits;
pub mod transport;

// Public API
#[doc(inline)]
pub use compute::types::AlgorithmRegistry;
#[doc(inline)]
pub use compute::types::GraphCompute;
#[doc(inline)]
pub use compute::types::GraphComputeBuilder;
#[doc(inline)]
pub use graph::types::Graph;
#[doc(inline)]
pub use graph::types::InteractionSets;
#[doc(inline)]
pub use graph::types::NodeIndex;
#[doc(inline)]
pub use graph::types::TreeNode;
#[doc(inline)]
pub use traits::compute::{Combine, Executor, Generate};
#[doc(inline)]
pub use traits::graph::GraphNode;
#[doc(inline)]
pub use traits::transport::Transport;
#[doc(inline)]
pub use traits::types::{AlgorithmChoice, GraphError};
#[doc(inline)]
pub use transport::{LocalTransport, ThreadTransport};
