use super::KvNode;
use crate::transport::client::PeerClient;
use crate::transport::protocol::{GetRequest, ReplicaGetRequest, ValueReply};

impl<P: PeerClient> KvNode<P> {
    /// Looks `key` up on its owner, falling back to the replicas in order.
    ///
    /// Replica hits are returned as-is; the owner is not repaired.
    pub async fn get(&self, key: String) -> ValueReply {
        let owner = self.partitioner.owner(&key);
        if owner != self.id {
            return self.forward(owner, GetRequest { key }).await;
        }

        if let Some(value) = self.store.get(&key) {
            return ValueReply::found(value);
        }

        let (first, second) = self.partitioner.replicas(self.id);
        for replica in [first, second] {
            if replica == self.id || !self.membership.is_alive(replica) {
                continue;
            }

            match self
                .call_peer(replica, ReplicaGetRequest { key: key.clone() })
                .await
            {
                Ok(reply) if reply.found => {
                    tracing::debug!("GET {} served from replica {}", key, replica);
                    return reply;
                }
                Ok(_) => {
                    tracing::debug!("GET {} not on replica {}", key, replica);
                }
                Err(_) => {}
            }
        }

        ValueReply::missing()
    }

    /// Local lookup with no ownership check, used by owners probing their replicas.
    pub fn replica_get(&self, key: &str) -> ValueReply {
        match self.store.get(key) {
            Some(value) => ValueReply::found(value),
            None => ValueReply::missing(),
        }
    }
}
