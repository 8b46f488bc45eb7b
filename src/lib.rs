//! Replicated, Partitioned Key-Value Store Library
//!
//! This library crate defines the modules that make up a cluster node.
//! It serves as the foundation for the node binary (`main.rs`) and the interactive client (`cli`).
//!
//! ## Architecture Modules
//! - **`cluster`**: Static topology. The `NodeId -> address` map and the timing every node agrees on,
//!   loaded once from a JSON file.
//! - **`storage`**: The node-local layer. Hash partitioner (owner + two successor replicas) and the
//!   lock-guarded in-memory table.
//! - **`membership`**: Each node's best-effort view of which peers are reachable.
//! - **`node`**: The engine. Quorum writes, fallback reads, forwarding to owners, heartbeats and
//!   startup recovery, all on top of a single `call_peer` primitive.
//! - **`transport`**: The wire. Request/reply DTOs, the axum router and the reqwest peer client.

pub mod cluster;
pub mod error;
pub mod membership;
pub mod node;
pub mod storage;
pub mod transport;
