//! Collective communication used to coordinate processes.

/// Interface to the collective operations of a fixed group of cooperating processes.
///
/// Every method is collective except `rank` and `size`: all processes of the group must call it, in
/// the same order, and each call blocks until the whole group has arrived.
pub trait Transport {
    /// Rank of this process within the group.
    fn rank(&self) -> i32;

    /// Number of processes in the group.
    fn size(&self) -> i32;

    /// Block until every process has called `barrier`.
    fn barrier(&self);

    /// Broadcast a value from `root` to all processes, returning the root's value everywhere.
    ///
    /// # Arguments
    /// * `value` - Value to send, only read at `root`.
    /// * `root` - Rank of the sending process.
    fn broadcast(&self, value: u64, root: i32) -> u64;

    /// Gather one value from every process at every process, in rank order.
    ///
    /// # Arguments
    /// * `value` - Contribution of this process.
    fn all_gather(&self, value: u64) -> Vec<u64>;

    /// Gather a byte buffer of any length from every process at every process, in rank order.
    ///
    /// # Arguments
    /// * `bytes` - Contribution of this process.
    fn all_gather_bytes(&self, bytes: &[u8]) -> Vec<Vec<u8>>;
}
