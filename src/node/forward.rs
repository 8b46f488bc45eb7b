use super::KvNode;
use crate::cluster::types::NodeId;
use crate::transport::client::PeerClient;
use crate::transport::protocol::{FailureReply, ServiceCall};

impl<P: PeerClient> KvNode<P> {
    /// Hands a request this node does not own to `owner` and relays the reply.
    ///
    /// Membership is not consulted first. If the owner cannot be reached it is
    /// marked down and the caller receives a failure reply of the usual shape.
    pub(crate) async fn forward<C>(&self, owner: NodeId, request: C) -> C::Reply
    where
        C: ServiceCall,
        C::Reply: FailureReply,
    {
        tracing::debug!("Forwarding {} to owner {}", C::NAME, owner);

        match self.call_peer(owner, request).await {
            Ok(reply) => reply,
            Err(e) => C::Reply::failure(format!("FAIL ({})", e)),
        }
    }
}
