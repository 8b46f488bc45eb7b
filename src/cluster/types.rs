use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a node: an integer in `[0, N)`.
///
/// Doubles as a partition id, since node `n` owns exactly the keys that hash to `n`.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the cluster configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeAddress {
    pub id: NodeId,
    /// `host:port` the node's RPC listener binds to and peers dial.
    pub addr: String,
}

/// Validated, immutable mapping from node id to network address.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterMap {
    nodes: BTreeMap<NodeId, String>,
}

impl ClusterMap {
    pub(crate) fn from_validated(nodes: BTreeMap<NodeId, String>) -> Self {
        Self { nodes }
    }

    /// Number of nodes, `N`.
    pub fn size(&self) -> u32 {
        self.nodes.len() as u32
    }

    pub fn address(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All node ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }
}
