//! Transport simulating a group of processes with threads of the calling process.
use std::{
    sync::{Arc, Barrier},
    thread,
};

use parking_lot::Mutex;

use crate::traits::transport::Transport;

struct Shared {
    barrier: Barrier,
    slots: Mutex<Vec<u64>>,
    byte_slots: Mutex<Vec<Vec<u8>>>,
    root_value: Mutex<u64>,
}

/// One rank of an in-process group, each rank is driven by its own thread.
///
/// Collectives are built from a shared barrier: values are deposited, the group synchronises, values
/// are read, and the group synchronises again before a slot can be reused.
#[derive(Clone)]
pub struct ThreadTransport {
    rank: i32,
    size: i32,
    shared: Arc<Shared>,
}

impl ThreadTransport {
    /// Create the ranks of a group of `size` processes.
    ///
    /// # Arguments
    /// * `size` - Number of ranks, at least one.
    pub fn group(size: i32) -> Vec<ThreadTransport> {
        let size = size.max(1);
        let shared = Arc::new(Shared {
            barrier: Barrier::new(size as usize),
            slots: Mutex::new(vec![0; size as usize]),
            byte_slots: Mutex::new(vec![Vec::new(); size as usize]),
            root_value: Mutex::new(0),
        });

        (0..size)
            .map(|rank| ThreadTransport {
                rank,
                size,
                shared: shared.clone(),
            })
            .collect()
    }

    /// Run `f` on every rank of a new group, one scoped thread per rank, returning the results in
    /// rank order.
    ///
    /// # Arguments
    /// * `size` - Number of ranks.
    /// * `f` - Body executed by every rank.
    pub fn run<F, R>(size: i32, f: F) -> Vec<R>
    where
        F: Fn(ThreadTransport) -> R + Sync,
        R: Send,
    {
        let f = &f;
        thread::scope(|s| {
            let handles = ThreadTransport::group(size)
                .into_iter()
                .map(|transport| s.spawn(move || f(transport)))
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

impl Transport for ThreadTransport {
    fn rank(&self) -> i32 {
        self.rank
    }

    fn size(&self) -> i32 {
        self.size
    }

    fn barrier(&self) {
        self.shared.barrier.wait();
    }

    fn broadcast(&self, value: u64, root: i32) -> u64 {
        if self.rank == root {
            *self.shared.root_value.lock() = value;
        }
        self.shared.barrier.wait();
        let result = *self.shared.root_value.lock();
        self.shared.barrier.wait();
        result
    }

    fn all_gather(&self, value: u64) -> Vec<u64> {
        self.shared.slots.lock()[self.rank as usize] = value;
        self.shared.barrier.wait();
        let result = self.shared.slots.lock().clone();
        self.shared.barrier.wait();
        result
    }

    fn all_gather_bytes(&self, bytes: &[u8]) -> Vec<Vec<u8>> {
        self.shared.byte_slots.lock()[self.rank as usize] = bytes.to_vec();
        self.shared.barrier.wait();
        let result = self.shared.byte_slots.lock().clone();
        self.shared.barrier.wait();
        result
    }
}
