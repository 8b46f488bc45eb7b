use super::KvNode;
use crate::cluster::types::NodeId;
use crate::transport::client::PeerClient;
use crate::transport::protocol::PingRequest;

use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

impl<P: PeerClient> KvNode<P> {
    /// Spawns the heartbeat loop. The first round runs one period after startup.
    pub fn spawn_heartbeat(self: &Arc<Self>) -> JoinHandle<()> {
        let node = self.clone();
        let period = node.timing.heartbeat_interval();

        tokio::spawn(async move {
            tracing::info!("Heartbeat loop started (every {:?})", period);
            let mut interval = interval_at(Instant::now() + period, period);

            loop {
                interval.tick().await;
                node.heartbeat_round().await;
            }
        })
    }

    /// Pings every other node once; the answer alone decides up or down.
    pub async fn heartbeat_round(&self) {
        let peers: Vec<NodeId> = self
            .cluster
            .node_ids()
            .filter(|peer| *peer != self.id)
            .collect();

        let results = join_all(
            peers
                .iter()
                .map(|peer| self.call_peer(*peer, PingRequest::default())),
        )
        .await;

        for (peer, result) in peers.iter().zip(results) {
            if result.is_ok() {
                self.membership.mark_up(*peer);
            }
        }

        tracing::debug!(
            "Heartbeat done: {}/{} nodes alive",
            self.membership.alive_count(),
            self.cluster.size()
        );
    }
}
