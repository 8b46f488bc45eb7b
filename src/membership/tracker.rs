use crate::cluster::types::NodeId;

use dashmap::DashSet;

/// This node's view of which cluster members are reachable.
///
/// Starts with every node marked up. Failed calls take a peer out, and only a
/// successful heartbeat ping puts it back. The local node is always a member.
#[derive(Debug)]
pub struct Membership {
    local: NodeId,
    alive: DashSet<NodeId>,
}

impl Membership {
    pub fn new(local: NodeId, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let alive = DashSet::new();
        for node in nodes {
            alive.insert(node);
        }
        alive.insert(local);

        Self { local, alive }
    }

    pub fn local(&self) -> NodeId {
        self.local
    }

    pub fn is_alive(&self, node: NodeId) -> bool {
        self.alive.contains(&node)
    }

    /// Returns `true` if the peer was previously considered up.
    pub fn mark_down(&self, node: NodeId) -> bool {
        if node == self.local {
            return false;
        }

        let removed = self.alive.remove(&node).is_some();
        if removed {
            tracing::warn!("Node {} marked down", node);
        }
        removed
    }

    /// Returns `true` if the peer was previously considered down.
    pub fn mark_up(&self, node: NodeId) -> bool {
        let added = self.alive.insert(node);
        if added {
            tracing::info!("Node {} is back up", node);
        }
        added
    }

    /// Reachable peers (self excluded), ascending.
    pub fn alive_peers(&self) -> Vec<NodeId> {
        let mut peers: Vec<NodeId> = self
            .alive
            .iter()
            .map(|entry| *entry.key())
            .filter(|node| *node != self.local)
            .collect();
        peers.sort();
        peers
    }

    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }
}
