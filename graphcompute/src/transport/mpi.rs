//! Transport over an MPI communicator.
use itertools::Itertools;
use mpi::{
    collective::CommunicatorCollectives,
    datatype::PartitionMut,
    topology::{Communicator, SimpleCommunicator},
    traits::Root,
    Count,
};

use crate::traits::transport::Transport;

impl Transport for SimpleCommunicator {
    fn rank(&self) -> i32 {
        Communicator::rank(self)
    }

    fn size(&self) -> i32 {
        Communicator::size(self)
    }

    fn barrier(&self) {
        CommunicatorCollectives::barrier(self);
    }

    fn broadcast(&self, value: u64, root: i32) -> u64 {
        let mut buffer = value;
        self.process_at_rank(root).broadcast_into(&mut buffer);
        buffer
    }

    fn all_gather(&self, value: u64) -> Vec<u64> {
        let mut buffer = vec![0u64; Communicator::size(self) as usize];
        self.all_gather_into(&value, &mut buffer[..]);
        buffer
    }

    fn all_gather_bytes(&self, bytes: &[u8]) -> Vec<Vec<u8>> {
        let size = Communicator::size(self) as usize;

        let count = bytes.len() as Count;
        let mut counts = vec![0 as Count; size];
        self.all_gather_into(&count, &mut counts[..]);

        let mut displacements = Vec::with_capacity(size);
        let mut displacement = 0;
        for &count in counts.iter() {
            displacements.push(displacement);
            displacement += count;
        }

        let mut received = vec![0u8; displacement as usize];
        {
            let mut partition = PartitionMut::new(&mut received, &counts[..], &displacements[..]);
            self.all_gather_varcount_into(bytes, &mut partition);
        }

        counts
            .iter()
            .zip(displacements.iter())
            .map(|(&c, &d)| received[d as usize..(d + c) as usize].to_vec())
            .collect_vec()
    }
}
