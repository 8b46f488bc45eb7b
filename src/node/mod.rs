//! Node Engine Module
//!
//! `KvNode` is one cluster member: it owns the local store and the membership view
//! and implements every RPC of the node service on top of them.
//!
//! ## Submodules
//! - **`replication`**: Put/Delete on the owner plus propagation to replicas (write quorum 2 of 3).
//! - **`read`**: Get with fallback to replicas.
//! - **`forward`**: redirection of requests that arrive at a non-owner.
//! - **`heartbeat`**: periodic liveness probing of all peers.
//! - **`recovery`**: one-shot pull of the node's own partition after a restart.
//!
//! All outbound traffic goes through [`KvNode::call_peer`], which applies the call
//! timeout and marks unresponsive peers down.

mod forward;
mod heartbeat;
mod read;
mod recovery;
mod replication;


pub use recovery::RecoveryReport;

use crate::cluster::config::Timing;
use crate::cluster::types::{ClusterMap, NodeId};
use crate::error::{KvError, PeerError, Result};
use crate::membership::tracker::Membership;
use crate::storage::memory::LocalStore;
use crate::storage::partitioner::Partitioner;
use crate::transport::client::PeerClient;
use crate::transport::protocol::ServiceCall;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct KvNode<P> {
    id: NodeId,
    cluster: Arc<ClusterMap>,
    partitioner: Partitioner,
    store: LocalStore,
    membership: Membership,
    peers: Arc<P>,
    timing: Timing,
    /// Cleared while recovery runs; client-facing RPCs are refused meanwhile.
    accepting_clients: AtomicBool,
}

impl<P: PeerClient> KvNode<P> {
    pub fn new(
        id: NodeId,
        cluster: Arc<ClusterMap>,
        timing: Timing,
        peers: Arc<P>,
    ) -> Result<Arc<Self>> {
        if !cluster.contains(id) {
            return Err(KvError::Config(format!(
                "node {} is not part of the cluster map",
                id
            )));
        }

        Ok(Arc::new(Self {
            id,
            partitioner: Partitioner::new(cluster.size()),
            membership: Membership::new(id, cluster.node_ids()),
            cluster,
            store: LocalStore::new(),
            peers,
            timing,
            accepting_clients: AtomicBool::new(true),
        }))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    pub fn partitioner(&self) -> &Partitioner {
        &self.partitioner
    }

    pub fn is_owner(&self, key: &str) -> bool {
        self.partitioner.owner(key) == self.id
    }

    pub fn is_accepting_clients(&self) -> bool {
        self.accepting_clients.load(Ordering::SeqCst)
    }

    fn set_accepting_clients(&self, accepting: bool) {
        self.accepting_clients.store(accepting, Ordering::SeqCst);
    }

    /// This node's replicas that are currently believed reachable, in replica order.
    fn live_replicas(&self) -> Vec<NodeId> {
        let (first, second) = self.partitioner.replicas(self.id);
        [first, second]
            .into_iter()
            .filter(|replica| *replica != self.id && self.membership.is_alive(*replica))
            .collect()
    }

    /// Invokes `request` on `target`, bounded by the call timeout.
    ///
    /// Any failure (timeout included) removes `target` from the membership set.
    pub async fn call_peer<C: ServiceCall>(
        &self,
        target: NodeId,
        request: C,
    ) -> std::result::Result<C::Reply, PeerError> {
        let timeout = self.timing.call_timeout();

        let outcome = match tokio::time::timeout(timeout, self.peers.call(target, request)).await {
            Ok(result) => result,
            Err(_) => Err(PeerError::Timeout {
                node: target,
                after_ms: timeout.as_millis() as u64,
            }),
        };

        if let Err(e) = &outcome {
            tracing::warn!("{} to node {} failed: {}", C::NAME, target, e);
            self.membership.mark_down(target);
        }

        outcome
    }
}
