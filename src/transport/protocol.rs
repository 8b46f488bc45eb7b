//! Node Service Protocol
//!
//! Defines the API endpoints and Data Transfer Objects (DTOs) of the node service,
//! used both by clients (Put, Get, Delete) and by peers (replication, liveness, recovery).
//!
//! Every request type implements [`ServiceCall`], which names its endpoint, its reply
//! type, and how a node serves it. The reply shape of each RPC is therefore known at
//! compile time on both sides of the wire.

use crate::cluster::types::NodeId;
use crate::node::KvNode;
use crate::transport::client::PeerClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- API Endpoints ---

/// Public endpoint for client write requests.
pub const ENDPOINT_PUT: &str = "/put";
/// Public endpoint for client read requests.
pub const ENDPOINT_GET: &str = "/get";
/// Public endpoint for client delete requests.
pub const ENDPOINT_DELETE: &str = "/delete";
/// Owner to replica write propagation.
pub const ENDPOINT_REPLICA_PUT: &str = "/internal/replica_put";
/// Owner to replica delete propagation.
pub const ENDPOINT_REPLICA_DELETE: &str = "/internal/replica_delete";
/// Direct local lookup on a replica (bypassing routing logic).
pub const ENDPOINT_REPLICA_GET: &str = "/internal/replica_get";
/// Liveness probe used by the heartbeat loop.
pub const ENDPOINT_PING: &str = "/internal/ping";
/// Bulk transfer of one partition to a recovering node.
pub const ENDPOINT_RECOVER: &str = "/internal/recover";

/// An RPC of the node service.
#[async_trait]
pub trait ServiceCall: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Reply: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Human readable RPC name, used in logs.
    const NAME: &'static str;
    const ENDPOINT: &'static str;

    /// Executes the call against the receiving node.
    async fn serve<P: PeerClient>(self, node: &KvNode<P>) -> Self::Reply;
}

/// Replies a node can synthesize locally when the real callee could not be reached.
pub trait FailureReply {
    fn failure(cause: String) -> Self;
}

// --- Replies ---

/// Acknowledgment for writes, deletes and pings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub success: bool,
    pub message: String,
}

impl Reply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

impl FailureReply for Reply {
    fn failure(cause: String) -> Self {
        Self {
            success: false,
            message: cause,
        }
    }
}

/// Result of a lookup. `found == false` is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueReply {
    pub found: bool,
    pub value: String,
    /// Set only when the lookup could not be carried out (e.g. owner unreachable).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValueReply {
    pub fn found(value: String) -> Self {
        Self {
            found: true,
            value,
            error: None,
        }
    }

    pub fn missing() -> Self {
        Self {
            found: false,
            value: String::new(),
            error: None,
        }
    }
}

impl FailureReply for ValueReply {
    fn failure(cause: String) -> Self {
        Self {
            found: false,
            value: String::new(),
            error: Some(cause),
        }
    }
}

/// Every key a node holds for the requested partition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataDump {
    pub data: HashMap<String, String>,
}

// --- Requests ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutRequest {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRequest {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaPutRequest {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaDeleteRequest {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicaGetRequest {
    pub key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PingRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverRequest {
    pub partition_id: NodeId,
}

const RECOVERING: &str = "node is recovering";

#[async_trait]
impl ServiceCall for PutRequest {
    type Reply = Reply;
    const NAME: &'static str = "Put";
    const ENDPOINT: &'static str = ENDPOINT_PUT;

    async fn serve<P: PeerClient>(self, node: &KvNode<P>) -> Reply {
        if !node.is_accepting_clients() {
            return Reply::failure(RECOVERING.to_string());
        }
        node.put(self.key, self.value).await
    }
}

#[async_trait]
impl ServiceCall for GetRequest {
    type Reply = ValueReply;
    const NAME: &'static str = "Get";
    const ENDPOINT: &'static str = ENDPOINT_GET;

    async fn serve<P: PeerClient>(self, node: &KvNode<P>) -> ValueReply {
        if !node.is_accepting_clients() {
            return ValueReply::failure(RECOVERING.to_string());
        }
        node.get(self.key).await
    }
}

#[async_trait]
impl ServiceCall for DeleteRequest {
    type Reply = Reply;
    const NAME: &'static str = "Delete";
    const ENDPOINT: &'static str = ENDPOINT_DELETE;

    async fn serve<P: PeerClient>(self, node: &KvNode<P>) -> Reply {
        if !node.is_accepting_clients() {
            return Reply::failure(RECOVERING.to_string());
        }
        node.delete(self.key).await
    }
}

#[async_trait]
impl ServiceCall for ReplicaPutRequest {
    type Reply = Reply;
    const NAME: &'static str = "ReplicaPut";
    const ENDPOINT: &'static str = ENDPOINT_REPLICA_PUT;

    async fn serve<P: PeerClient>(self, node: &KvNode<P>) -> Reply {
        node.replica_put(self.key, self.value)
    }
}

#[async_trait]
impl ServiceCall for ReplicaDeleteRequest {
    type Reply = Reply;
    const NAME: &'static str = "ReplicaDelete";
    const ENDPOINT: &'static str = ENDPOINT_REPLICA_DELETE;

    async fn serve<P: PeerClient>(self, node: &KvNode<P>) -> Reply {
        node.replica_delete(&self.key)
    }
}

#[async_trait]
impl ServiceCall for ReplicaGetRequest {
    type Reply = ValueReply;
    const NAME: &'static str = "ReplicaGet";
    const ENDPOINT: &'static str = ENDPOINT_REPLICA_GET;

    async fn serve<P: PeerClient>(self, node: &KvNode<P>) -> ValueReply {
        node.replica_get(&self.key)
    }
}

#[async_trait]
impl ServiceCall for PingRequest {
    type Reply = Reply;
    const NAME: &'static str = "Ping";
    const ENDPOINT: &'static str = ENDPOINT_PING;

    async fn serve<P: PeerClient>(self, _node: &KvNode<P>) -> Reply {
        Reply::ok("PONG")
    }
}

#[async_trait]
impl ServiceCall for RecoverRequest {
    type Reply = DataDump;
    const NAME: &'static str = "Recover";
    const ENDPOINT: &'static str = ENDPOINT_RECOVER;

    async fn serve<P: PeerClient>(self, node: &KvNode<P>) -> DataDump {
        DataDump {
            data: node.partition_snapshot(self.partition_id),
        }
    }
}
