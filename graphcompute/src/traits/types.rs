//! Utility types for trait definitions.
use std::{fmt, time::Instant};

use thiserror::Error;

/// Tag naming an execution strategy.
///
/// The same tag space is used twice in a computation: once as the *generation mode*, describing
/// how the generate function behaved (declared by it, or inferred from its output), and once as the
/// *combine case*, selecting the executor that performs the combination.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlgorithmChoice {
    /// Undetermined, or a general dependency structure with no specialised executor.
    #[default]
    General = 0,

    /// Each node combines only with itself.
    LocalComputation = 1,

    /// Interaction sets are fully resolved, no ordering between nodes is required.
    NoDependency = 2,

    /// Upward accumulation over an upside-down tree.
    UpwardAccumulateReverse = 3,

    /// Each node's interaction set is exactly its children.
    UpwardAccumulateSpecial = 4,

    /// Upward accumulation with arbitrary descendants in interaction sets.
    UpwardAccumulateGeneral = 5,

    /// Each node's interaction set is exactly its parent.
    DownwardAccumulateSpecial = 6,

    /// Downward accumulation with arbitrary ancestors in interaction sets.
    DownwardAccumulateGeneral = 7,

    /// Downward accumulation over an upside-down tree.
    DownwardAccumulateReverse = 8,
}

impl AlgorithmChoice {
    /// All tags, in discriminant order.
    pub const ALL: [AlgorithmChoice; 9] = [
        AlgorithmChoice::General,
        AlgorithmChoice::LocalComputation,
        AlgorithmChoice::NoDependency,
        AlgorithmChoice::UpwardAccumulateReverse,
        AlgorithmChoice::UpwardAccumulateSpecial,
        AlgorithmChoice::UpwardAccumulateGeneral,
        AlgorithmChoice::DownwardAccumulateSpecial,
        AlgorithmChoice::DownwardAccumulateGeneral,
        AlgorithmChoice::DownwardAccumulateReverse,
    ];

    /// Whether this crate ships an executor for the tag.
    pub fn is_implemented(&self) -> bool {
        matches!(
            self,
            AlgorithmChoice::LocalComputation
                | AlgorithmChoice::NoDependency
                | AlgorithmChoice::UpwardAccumulateSpecial
                | AlgorithmChoice::DownwardAccumulateSpecial
        )
    }

    /// Raw representation, used on the wire.
    pub fn raw(&self) -> u8 {
        *self as u8
    }

    /// Recover a tag from its raw representation.
    pub fn from_raw(raw: u8) -> Option<Self> {
        AlgorithmChoice::ALL.get(raw as usize).copied()
    }
}

impl fmt::Display for AlgorithmChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Type to handle errors raised while scheduling a graph computation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Nodes of a single process disagree on the dependency flag or the generation mode.
    #[error("inconsistent interaction sets: {0}")]
    Inconsistency(String),

    /// Processes disagree on the classified combine case.
    #[error("processes disagree on combine strategy: {cases:?}")]
    Consensus {
        /// The `(rank, case)` pairs cast in the consensus round.
        cases: Vec<(i32, AlgorithmChoice)>,
    },

    /// One or more processes failed before the consensus round.
    #[error("processes {ranks:?} failed before reaching consensus")]
    Aborted {
        /// Ranks that reported a local failure.
        ranks: Vec<i32>,
    },

    /// No executor registered for a case that is normally provided.
    #[error("no executor registered for {0}")]
    NotFound(AlgorithmChoice),

    /// The case is a valid classification, but has no implementation.
    #[error("{0} is not supported")]
    Unsupported(AlgorithmChoice),

    /// Ghost data received from a peer could not be decoded.
    #[error("ghost exchange failed: {0}")]
    Exchange(String),

    /// Invalid configuration of the compute object.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Enumeration of the timed phases of a graph computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseType {
    /// Whole computation, including synchronisation.
    Total,

    /// Interaction set generation.
    Generate,

    /// Combine case detection and consensus.
    Detect,

    /// Execution of the selected executor.
    Combine,
}

/// Wall time of a single phase in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTime {
    /// Phase being timed
    pub phase: PhaseType,

    /// Time in milliseconds
    pub time: u64,
}

impl PhaseTime {
    /// Constructor from the instant a phase started.
    pub fn from_instant(phase: PhaseType, instant: Instant) -> Self {
        Self {
            phase,
            time: instant.elapsed().as_millis() as u64,
        }
    }
}

/// Counts returned by an executor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombineReport {
    /// Number of calls made to the combine function.
    pub calls: usize,

    /// Number of calls for which the combine function returned `false`.
    pub rejected: usize,
}

impl CombineReport {
    /// Record the outcome of one combine call.
    pub fn record(&mut self, accepted: bool) {
        self.calls += 1;
        if !accepted {
            self.rejected += 1;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_raw_representation() {
        for choice in AlgorithmChoice::ALL {
            assert_eq!(AlgorithmChoice::from_raw(choice.raw()), Some(choice));
        }
        assert_eq!(AlgorithmChoice::from_raw(9), None);
        assert_eq!(AlgorithmChoice::default(), AlgorithmChoice::General);
    }

    #[test]
    fn test_implemented_cases() {
        let implemented = AlgorithmChoice::ALL
            .iter()
            .filter(|c| c.is_implemented())
            .count();
        assert_eq!(implemented, 4);
        assert!(!AlgorithmChoice::UpwardAccumulateReverse.is_implemented());
        assert!(!AlgorithmChoice::General.is_implemented());
    }

    #[test]
    fn test_combine_report() {
        let mut report = CombineReport::default();
        report.record(true);
        report.record(false);
        report.record(true);
        assert_eq!(report.calls, 3);
        assert_eq!(report.rejected, 1);
    }
}
