//! Refreshing ghost payloads from the processes owning them.
//!
//! Owners learn once which of their nodes are mirrored as ghosts elsewhere. Afterwards each refresh
//! is a single byte all-gather of fixed width `(key, payload)` records for one level, which every
//! process applies to the ghosts it holds.
use std::{collections::HashMap, mem};

use bytemuck::{bytes_of, cast_slice, pod_read_unaligned};
use itertools::Itertools;
use tracing::debug;

use crate::{
    graph::types::Graph,
    traits::{graph::GraphNode, transport::Transport, types::GraphError},
};

const KEY_BYTES: usize = mem::size_of::<[u64; 2]>();

/// Routing of payload updates between local nodes and the ghosts mirroring them.
///
/// # Fields
/// - `requested` - Whether each local node, in traversal order, is a ghost on some other process.
/// - `ghost_index` - Map from packed key to position of each local ghost.
#[derive(Debug, Clone)]
pub struct GhostExchange {
    /// Whether each local node is mirrored elsewhere.
    pub requested: Vec<bool>,

    /// Position of each ghost by packed key.
    pub ghost_index: HashMap<[u64; 2], usize>,
}

impl GhostExchange {
    /// Discover which local nodes are ghosts on other processes. Collective.
    ///
    /// # Arguments
    /// * `graph` - Local partition.
    /// * `transport` - Collective operations of the process group.
    pub fn new<N, T>(graph: &Graph<N>, transport: &T) -> Self
    where
        N: GraphNode,
        T: Transport,
    {
        let ghost_keys = graph
            .ghosts()
            .iter()
            .map(|ghost| N::pack_key(&ghost.key()))
            .collect_vec();

        let received = transport.all_gather_bytes(cast_slice(&ghost_keys[..]));

        let local_index = graph
            .iter()
            .enumerate()
            .map(|(i, node)| (N::pack_key(&node.key()), i))
            .collect::<HashMap<_, _>>();

        let mut requested = vec![false; graph.len()];
        for (rank, bytes) in received.iter().enumerate() {
            if rank as i32 == transport.rank() {
                continue;
            }
            for chunk in bytes.chunks_exact(KEY_BYTES) {
                let key: [u64; 2] = pod_read_unaligned(chunk);
                if let Some(&i) = local_index.get(&key) {
                    requested[i] = true;
                }
            }
        }

        let ghost_index = ghost_keys
            .into_iter()
            .enumerate()
            .map(|(i, key)| (key, i))
            .collect();

        debug!(
            rank = transport.rank(),
            n_requested = requested.iter().filter(|&&r| r).count(),
            n_ghosts = graph.ghosts().len(),
            "ghost exchange routing"
        );

        Self {
            requested,
            ghost_index,
        }
    }

    /// Send the payloads of mirrored local nodes at `level`, and overwrite local ghosts with the
    /// payloads received. Collective, returns the number of ghosts updated.
    ///
    /// # Arguments
    /// * `graph` - Local partition, ghost payloads are updated in place.
    /// * `level` - Level of the nodes whose payloads are sent.
    /// * `transport` - Collective operations of the process group.
    pub fn refresh<N, T>(
        &self,
        graph: &mut Graph<N>,
        level: u64,
        transport: &T,
    ) -> Result<usize, GraphError>
    where
        N: GraphNode,
        T: Transport,
    {
        let mut buffer = Vec::new();
        for (node, _) in graph
            .iter()
            .zip(self.requested.iter())
            .filter(|(node, requested)| **requested && node.level() == level)
        {
            buffer.extend_from_slice(bytes_of(&N::pack_key(&node.key())));
            buffer.extend_from_slice(bytes_of(&node.payload()));
        }

        let received = transport.all_gather_bytes(&buffer);

        let record = KEY_BYTES + mem::size_of::<N::Payload>();
        let mut n_updated = 0;

        for (rank, bytes) in received.iter().enumerate() {
            if rank as i32 == transport.rank() {
                continue;
            }

            if bytes.len() % record != 0 {
                return Err(GraphError::Exchange(format!(
                    "{} bytes from rank {} is not a whole number of {} byte records",
                    bytes.len(),
                    rank,
                    record
                )));
            }

            for chunk in bytes.chunks_exact(record) {
                let (key, payload) = chunk.split_at(KEY_BYTES);
                let key: [u64; 2] = pod_read_unaligned(key);
                if let Some(&i) = self.ghost_index.get(&key) {
                    graph.ghosts[i].set_payload(pod_read_unaligned(payload));
                    n_updated += 1;
                }
            }
        }

        Ok(n_updated)
    }
}
