use super::client::PeerClient;
use super::protocol::ServiceCall;
use crate::cluster::config::{ClusterConfig, Timing};
use crate::cluster::types::{ClusterMap, NodeId};
use crate::error::PeerError;
use crate::node::KvNode;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::sync::Arc;

pub(crate) type LoopbackNode = KvNode<LoopbackPeers>;

/// In-process cluster transport: calls go straight to the target node's handler.
///
/// Nodes can be killed (calls fail immediately) or stalled (calls never complete,
/// so the caller's timeout fires).
pub(crate) struct LoopbackPeers {
    cluster: Arc<ClusterMap>,
    timing: Timing,
    nodes: DashMap<NodeId, Arc<LoopbackNode>>,
    down: DashSet<NodeId>,
    stalled: DashSet<NodeId>,
    calls: DashMap<(NodeId, &'static str), usize>,
}

impl LoopbackPeers {
    /// Builds `size` nodes wired to one shared loopback transport.
    pub(crate) fn cluster(size: u32, timing: Timing) -> (Arc<Self>, Vec<Arc<LoopbackNode>>) {
        let cluster = Arc::new(
            ClusterConfig::localhost(size, 40000)
                .cluster_map()
                .expect("valid test cluster"),
        );

        let peers = Arc::new(Self {
            cluster: cluster.clone(),
            timing: timing.clone(),
            nodes: DashMap::new(),
            down: DashSet::new(),
            stalled: DashSet::new(),
            calls: DashMap::new(),
        });

        let nodes: Vec<Arc<LoopbackNode>> = cluster
            .node_ids()
            .map(|id| {
                let node = KvNode::new(id, cluster.clone(), timing.clone(), peers.clone())
                    .expect("node in cluster");
                peers.nodes.insert(id, node.clone());
                node
            })
            .collect();

        (peers, nodes)
    }

    pub(crate) fn node(&self, id: NodeId) -> Arc<LoopbackNode> {
        self.nodes
            .get(&id)
            .map(|entry| entry.value().clone())
            .expect("registered node")
    }

    pub(crate) fn kill(&self, id: NodeId) {
        self.down.insert(id);
    }

    pub(crate) fn revive(&self, id: NodeId) {
        self.down.remove(&id);
        self.stalled.remove(&id);
    }

    pub(crate) fn stall(&self, id: NodeId) {
        self.stalled.insert(id);
    }

    /// Replaces node `id` with a fresh, empty process and makes it reachable.
    pub(crate) fn restart(self: &Arc<Self>, id: NodeId) -> Arc<LoopbackNode> {
        let node = KvNode::new(id, self.cluster.clone(), self.timing.clone(), self.clone())
            .expect("node in cluster");
        self.nodes.insert(id, node.clone());
        self.revive(id);
        node
    }

    /// Number of `name` calls addressed to `target` so far, failed ones included.
    pub(crate) fn calls(&self, target: NodeId, name: &'static str) -> usize {
        self.calls.get(&(target, name)).map(|count| *count).unwrap_or(0)
    }
}

#[async_trait]
impl PeerClient for LoopbackPeers {
    async fn call<C: ServiceCall>(&self, target: NodeId, request: C) -> Result<C::Reply, PeerError> {
        *self.calls.entry((target, C::NAME)).or_insert(0) += 1;

        if self.down.contains(&target) {
            return Err(PeerError::Unreachable {
                node: target,
                reason: "connection refused".into(),
            });
        }
        if self.stalled.contains(&target) {
            futures::future::pending::<()>().await;
        }

        let node = self
            .nodes
            .get(&target)
            .map(|entry| entry.value().clone())
            .ok_or(PeerError::UnknownNode(target))?;

        Ok(request.serve(&node).await)
    }
}
