use super::KvNode;
use crate::cluster::types::NodeId;
use crate::transport::client::PeerClient;
use crate::transport::protocol::RecoverRequest;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Outcome of a successful recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Peer whose snapshot was merged.
    pub source: NodeId,
    /// Number of keys received from it.
    pub keys: usize,
}

impl<P: PeerClient> KvNode<P> {
    /// Starts the one-shot recovery task.
    ///
    /// Client-facing RPCs are refused from the moment this returns until the task
    /// finishes, whether or not a peer answered.
    pub fn spawn_recovery(self: &Arc<Self>) -> JoinHandle<Option<RecoveryReport>> {
        self.set_accepting_clients(false);
        let node = self.clone();

        tokio::spawn(async move {
            tokio::time::sleep(node.timing.recovery_delay()).await;
            let report = node.recover().await;
            node.set_accepting_clients(true);
            tracing::info!("Node {} accepting client requests", node.id);
            report
        })
    }

    /// Pulls this node's partition from the first live peer that answers.
    ///
    /// The first answer is final, even an empty one. Known gap: a peer that
    /// answers with an empty dump ends recovery even when a later peer still
    /// holds the partition.
    pub async fn recover(&self) -> Option<RecoveryReport> {
        for peer in self.membership.alive_peers() {
            let request = RecoverRequest {
                partition_id: self.id,
            };

            match self.call_peer(peer, request).await {
                Ok(dump) => {
                    let keys = dump.data.len();
                    self.store.merge(dump.data);
                    tracing::info!("Recovery done: {} keys from node {}", keys, peer);
                    return Some(RecoveryReport { source: peer, keys });
                }
                Err(e) => {
                    tracing::debug!("Recovery from node {} failed: {}", peer, e);
                }
            }
        }

        tracing::warn!("No peer answered recovery, starting with an empty store");
        None
    }

    /// Every locally held key whose owner is `partition_id`.
    pub fn partition_snapshot(&self, partition_id: NodeId) -> HashMap<String, String> {
        self.store
            .snapshot(|key| self.partitioner.owner(key) == partition_id)
    }
}
