//! # Transports
//!
//! Implementations of the collective operations used to coordinate processes.
mod local;
mod thread;

pub use local::LocalTransport;
pub use thread::ThreadTransport;

#[cfg(feature = "mpi")]
mod mpi;
