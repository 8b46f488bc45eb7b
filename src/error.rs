use crate::cluster::types::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization Error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, KvError>;

/// Failure of a single outbound call to a peer.
///
/// Every variant means the same thing to the caller: the peer did not produce a
/// reply within the call timeout and should be treated as down.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("node {0} is not part of the cluster map")]
    UnknownNode(NodeId),

    #[error("node {node} timed out after {after_ms}ms")]
    Timeout { node: NodeId, after_ms: u64 },

    #[error("node {node} unreachable: {reason}")]
    Unreachable { node: NodeId, reason: String },

    #[error("node {node} rejected the call with status {status}")]
    Rejected { node: NodeId, status: u16 },

    #[error("node {node} sent an undecodable reply: {reason}")]
    Decode { node: NodeId, reason: String },
}

impl PeerError {
    pub fn node(&self) -> NodeId {
        match self {
            PeerError::UnknownNode(node) => *node,
            PeerError::Timeout { node, .. }
            | PeerError::Unreachable { node, .. }
            | PeerError::Rejected { node, .. }
            | PeerError::Decode { node, .. } => *node,
        }
    }
}
