use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    routing::post,
};
use std::sync::Arc;
use tower::limit::GlobalConcurrencyLimitLayer;

use super::client::PeerClient;
use super::protocol::{
    DeleteRequest, GetRequest, PingRequest, PutRequest, RecoverRequest, ReplicaDeleteRequest,
    ReplicaGetRequest, ReplicaPutRequest, ServiceCall,
};
use crate::node::KvNode;

/// Generic handler: decodes the request, lets the node serve it, encodes the reply.
///
/// Every failure the node knows how to handle is already folded into the reply,
/// so the status is always 200.
pub async fn handle_call<C, P>(
    Extension(node): Extension<Arc<KvNode<P>>>,
    Json(req): Json<C>,
) -> (StatusCode, Json<C::Reply>)
where
    C: ServiceCall,
    P: PeerClient,
{
    tracing::debug!("Node {} serving {}", node.id(), C::NAME);
    let reply = req.serve(&node).await;
    (StatusCode::OK, Json(reply))
}

/// All RPC routes of a node, capped at `max_in_flight` concurrently running handlers.
pub fn router<P: PeerClient>(node: Arc<KvNode<P>>, max_in_flight: usize) -> Router {
    Router::new()
        .route(PutRequest::ENDPOINT, post(handle_call::<PutRequest, P>))
        .route(GetRequest::ENDPOINT, post(handle_call::<GetRequest, P>))
        .route(DeleteRequest::ENDPOINT, post(handle_call::<DeleteRequest, P>))
        .route(
            ReplicaPutRequest::ENDPOINT,
            post(handle_call::<ReplicaPutRequest, P>),
        )
        .route(
            ReplicaDeleteRequest::ENDPOINT,
            post(handle_call::<ReplicaDeleteRequest, P>),
        )
        .route(
            ReplicaGetRequest::ENDPOINT,
            post(handle_call::<ReplicaGetRequest, P>),
        )
        .route(PingRequest::ENDPOINT, post(handle_call::<PingRequest, P>))
        .route(RecoverRequest::ENDPOINT, post(handle_call::<RecoverRequest, P>))
        .layer(GlobalConcurrencyLimitLayer::new(max_in_flight))
        .layer(Extension(node))
}
