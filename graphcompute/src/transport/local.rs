//! Transport for a single process.
use crate::traits::transport::Transport;

/// Group containing only the calling process, collectives return immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTransport;

impl Transport for LocalTransport {
    fn rank(&self) -> i32 {
        0
    }

    fn size(&self) -> i32 {
        1
    }

    fn barrier(&self) {}

    fn broadcast(&self, value: u64, _root: i32) -> u64 {
        value
    }

    fn all_gather(&self, value: u64) -> Vec<u64> {
        vec![value]
    }

    fn all_gather_bytes(&self, bytes: &[u8]) -> Vec<Vec<u8>> {
        vec![bytes.to_vec()]
    }
}
