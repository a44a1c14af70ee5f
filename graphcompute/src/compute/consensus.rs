//! Agreement on the combine case across processes.
//!
//! Each process packs its vote into a single word which is all-gathered, so every process sees
//! every vote and reaches the same verdict without a further round. A process that failed locally
//! still casts a vote, which lets its peers abort instead of waiting on a later collective.
use itertools::Itertools;
use tracing::debug;

use crate::traits::{
    transport::Transport,
    types::{AlgorithmChoice, GraphError},
};

use super::types::Ballot;

const AGREE: u64 = 0;
const ABSTAIN: u64 = 1;
const FAILED: u64 = 2;

impl Ballot {
    /// Pack into a word for transport.
    pub fn to_word(&self) -> u64 {
        match self {
            Ballot::Agree(case) => (AGREE << 8) | case.raw() as u64,
            Ballot::Abstain => ABSTAIN << 8,
            Ballot::Failed => FAILED << 8,
        }
    }

    /// Unpack a word received from a peer, malformed words count as failures.
    pub fn from_word(word: u64) -> Self {
        match word >> 8 {
            AGREE => AlgorithmChoice::from_raw((word & 0xff) as u8)
                .map(Ballot::Agree)
                .unwrap_or(Ballot::Failed),
            ABSTAIN => Ballot::Abstain,
            _ => Ballot::Failed,
        }
    }
}

/// Decide the outcome of a consensus round from the ballots of all processes, in rank order.
///
/// Any failed ballot aborts the computation. Otherwise all agreeing ballots must name the same
/// case, abstentions accept it. If every process abstains there is nothing to compute anywhere, and
/// the trivial `LocalComputation` case is chosen.
///
/// # Arguments
/// * `ballots` - One ballot per process.
pub fn tally(ballots: &[Ballot]) -> Result<AlgorithmChoice, GraphError> {
    let failed = ballots
        .iter()
        .enumerate()
        .filter(|(_, ballot)| **ballot == Ballot::Failed)
        .map(|(rank, _)| rank as i32)
        .collect_vec();

    if !failed.is_empty() {
        return Err(GraphError::Aborted { ranks: failed });
    }

    let cases = ballots
        .iter()
        .enumerate()
        .filter_map(|(rank, ballot)| match ballot {
            Ballot::Agree(case) => Some((rank as i32, *case)),
            _ => None,
        })
        .collect_vec();

    if cases.iter().map(|(_, case)| case).all_equal() {
        Ok(cases
            .first()
            .map(|&(_, case)| case)
            .unwrap_or(AlgorithmChoice::LocalComputation))
    } else {
        Err(GraphError::Consensus { cases })
    }
}

/// Exchange ballots between all processes and decide the agreed combine case.
///
/// # Arguments
/// * `transport` - Collective operations of the process group.
/// * `ballot` - Vote of this process.
pub fn reach_consensus<T>(transport: &T, ballot: Ballot) -> Result<AlgorithmChoice, GraphError>
where
    T: Transport,
{
    let ballots = transport
        .all_gather(ballot.to_word())
        .into_iter()
        .map(Ballot::from_word)
        .collect_vec();

    debug!(rank = transport.rank(), ?ballots, "consensus round");

    tally(&ballots)
}

#[cfg(test)]
mod test {
    use crate::transport::ThreadTransport;

    use super::*;

    #[test]
    fn test_ballot_words() {
        let mut ballots = AlgorithmChoice::ALL.iter().map(|&c| Ballot::Agree(c)).collect_vec();
        ballots.push(Ballot::Abstain);
        ballots.push(Ballot::Failed);

        for ballot in ballots {
            assert_eq!(Ballot::from_word(ballot.to_word()), ballot);
        }

        assert_eq!(Ballot::from_word(42), Ballot::Failed);
        assert_eq!(Ballot::from_word(7 << 8), Ballot::Failed);
    }

    #[test]
    fn test_tally() {
        let up = AlgorithmChoice::UpwardAccumulateSpecial;
        let down = AlgorithmChoice::DownwardAccumulateSpecial;

        assert_eq!(tally(&[Ballot::Agree(up), Ballot::Agree(up)]), Ok(up));
        assert_eq!(tally(&[Ballot::Abstain, Ballot::Agree(down)]), Ok(down));
        assert_eq!(
            tally(&[Ballot::Abstain, Ballot::Abstain]),
            Ok(AlgorithmChoice::LocalComputation)
        );
        assert_eq!(
            tally(&[Ballot::Agree(up), Ballot::Abstain, Ballot::Agree(down)]),
            Err(GraphError::Consensus {
                cases: vec![(0, up), (2, down)]
            })
        );
        assert_eq!(
            tally(&[Ballot::Agree(up), Ballot::Failed, Ballot::Agree(down), Ballot::Failed]),
            Err(GraphError::Aborted { ranks: vec![1, 3] })
        );
    }

    #[test]
    fn test_reach_consensus() {
        let results = ThreadTransport::run(3, |transport| {
            let ballot = if transport.rank() == 1 {
                Ballot::Abstain
            } else {
                Ballot::Agree(AlgorithmChoice::NoDependency)
            };
            reach_consensus(&transport, ballot)
        });
        assert!(results
            .iter()
            .all(|r| *r == Ok(AlgorithmChoice::NoDependency)));

        let results = ThreadTransport::run(2, |transport| {
            let case = if transport.rank() == 0 {
                AlgorithmChoice::LocalComputation
            } else {
                AlgorithmChoice::DownwardAccumulateSpecial
            };
            reach_consensus(&transport, Ballot::Agree(case))
        });
        assert!(results
            .iter()
            .all(|r| matches!(r, Err(GraphError::Consensus { .. }))));
    }
}
