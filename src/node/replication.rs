use super::KvNode;
use crate::storage::partitioner::{REPLICATION_FACTOR, WRITE_QUORUM};
use crate::transport::client::PeerClient;
use crate::transport::protocol::{
    DeleteRequest, FailureReply, PutRequest, ReplicaDeleteRequest, ReplicaPutRequest, Reply,
};

use futures::future::join_all;

impl<P: PeerClient> KvNode<P> {
    /// Writes `key` on its owner and pushes it to the owner's live replicas.
    ///
    /// Succeeds once the owner plus at least one replica hold the value. A failed
    /// quorum is reported but the owner's local write stays in place.
    pub async fn put(&self, key: String, value: String) -> Reply {
        let owner = self.partitioner.owner(&key);
        if owner != self.id {
            return self.forward(owner, PutRequest { key, value }).await;
        }

        self.store.set(key.clone(), value.clone());
        let mut acks = 1;

        let replicas = self.live_replicas();
        let results = join_all(replicas.iter().map(|replica| {
            self.call_peer(
                *replica,
                ReplicaPutRequest {
                    key: key.clone(),
                    value: value.clone(),
                },
            )
        }))
        .await;

        for (replica, result) in replicas.iter().zip(results) {
            match result {
                Ok(reply) if reply.success => acks += 1,
                Ok(reply) => {
                    tracing::warn!("Replica {} refused write: {}", replica, reply.message);
                }
                Err(_) => {}
            }
        }

        if acks >= WRITE_QUORUM {
            tracing::debug!("PUT {} acknowledged by {}/{}", key, acks, REPLICATION_FACTOR);
            Reply::ok("OK")
        } else {
            tracing::warn!(
                "PUT {} below write quorum ({}/{} acks), kept locally",
                key,
                acks,
                REPLICATION_FACTOR
            );
            Reply::failure(format!(
                "Replica failed: {} of {} copies acknowledged, {} required",
                acks, REPLICATION_FACTOR, WRITE_QUORUM
            ))
        }
    }

    /// Removes `key` on its owner and, best effort, on the live replicas.
    ///
    /// Always succeeds: deletes have no quorum requirement.
    pub async fn delete(&self, key: String) -> Reply {
        let owner = self.partitioner.owner(&key);
        if owner != self.id {
            return self.forward(owner, DeleteRequest { key }).await;
        }

        self.store.delete(&key);

        let replicas = self.live_replicas();
        join_all(
            replicas
                .iter()
                .map(|replica| self.call_peer(*replica, ReplicaDeleteRequest { key: key.clone() })),
        )
        .await;

        Reply::ok("DELETED")
    }

    /// Unconditional local write on behalf of an owner.
    pub fn replica_put(&self, key: String, value: String) -> Reply {
        self.store.set(key, value);
        Reply::ok("REPLICA_OK")
    }

    /// Unconditional local delete on behalf of an owner.
    pub fn replica_delete(&self, key: &str) -> Reply {
        self.store.delete(key);
        Reply::ok("REPLICA_DEL")
    }
}
