//! # Trait Definitions
pub mod compute;
pub mod graph;
pub mod transport;
pub mod types;
