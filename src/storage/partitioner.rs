use crate::cluster::types::NodeId;
use xxhash_rust::xxh3::xxh3_64;

/// Copies of every key: the owner plus two successor replicas.
pub const REPLICATION_FACTOR: usize = 3;
/// Acknowledgments (owner included) a Put needs to succeed.
pub const WRITE_QUORUM: usize = 2;

/// Maps keys to their owning node and owners to their replicas.
///
/// Pure function of the key bytes and the cluster size: every node (and the
/// client) computes the same answer without coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    cluster_size: u32,
}

impl Partitioner {
    pub fn new(cluster_size: u32) -> Self {
        assert!(cluster_size > 0, "cluster size must be positive");
        Self { cluster_size }
    }

    pub fn cluster_size(&self) -> u32 {
        self.cluster_size
    }

    pub fn owner(&self, key: &str) -> NodeId {
        let hash = xxh3_64(key.as_bytes());
        NodeId((hash % self.cluster_size as u64) as u32)
    }

    pub fn replicas(&self, node: NodeId) -> (NodeId, NodeId) {
        (
            NodeId((node.0 + 1) % self.cluster_size),
            NodeId((node.0 + 2) % self.cluster_size),
        )
    }

    /// Owner followed by its replicas, the order a client tries them in.
    pub fn preference_list(&self, key: &str) -> [NodeId; REPLICATION_FACTOR] {
        let owner = self.owner(key);
        let (first, second) = self.replicas(owner);
        [owner, first, second]
    }
}
