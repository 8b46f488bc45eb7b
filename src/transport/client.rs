use super::protocol::ServiceCall;
use crate::cluster::types::{ClusterMap, NodeId};
use crate::error::PeerError;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Outbound side of the node service: invokes one RPC on one node.
///
/// Implementations report every transport fault as a [`PeerError`]; deciding what
/// a failure means for membership is left to the caller.
#[async_trait]
pub trait PeerClient: Send + Sync + 'static {
    async fn call<C: ServiceCall>(&self, target: NodeId, request: C) -> Result<C::Reply, PeerError>;
}

/// JSON-over-HTTP peer client.
pub struct HttpPeerClient {
    cluster: Arc<ClusterMap>,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl HttpPeerClient {
    pub fn new(cluster: Arc<ClusterMap>, timeout: Duration) -> Self {
        Self {
            cluster,
            http_client: reqwest::Client::new(),
            timeout,
        }
    }

    fn url<C: ServiceCall>(&self, target: NodeId) -> Result<String, PeerError> {
        let addr = self
            .cluster
            .address(target)
            .ok_or(PeerError::UnknownNode(target))?;
        Ok(format!("http://{}{}", addr, C::ENDPOINT))
    }

    fn map_send_error(&self, target: NodeId, err: reqwest::Error) -> PeerError {
        if err.is_timeout() {
            PeerError::Timeout {
                node: target,
                after_ms: self.timeout.as_millis() as u64,
            }
        } else {
            PeerError::Unreachable {
                node: target,
                reason: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    async fn call<C: ServiceCall>(&self, target: NodeId, request: C) -> Result<C::Reply, PeerError> {
        let url = self.url::<C>(target)?;

        let response = self
            .http_client
            .post(url)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(target, e))?;

        if !response.status().is_success() {
            return Err(PeerError::Rejected {
                node: target,
                status: response.status().as_u16(),
            });
        }

        response.json::<C::Reply>().await.map_err(|e| {
            if e.is_timeout() {
                self.map_send_error(target, e)
            } else {
                PeerError::Decode {
                    node: target,
                    reason: e.to_string(),
                }
            }
        })
    }
}
