//! Transport Module
//!
//! The node service as seen from the wire.
//!
//! - **`protocol`**: endpoints, request/reply DTOs and the `ServiceCall` contract.
//! - **`client`**: the `PeerClient` trait and its JSON-over-HTTP implementation.
//! - **`handlers`**: the axum router exposing every RPC of a node.
//! - **`loopback`** (tests only): an in-process `PeerClient` with fault injection.

pub mod client;
pub mod handlers;
pub mod protocol;

#[cfg(test)]
pub(crate) mod loopback;

pub use client::{HttpPeerClient, PeerClient};
pub use handlers::router;
