//! Membership Module
//!
//! Tracks which peers this node currently believes are reachable.
//!
//! ## Core Mechanisms
//! - **Binary liveness**: a peer is either up or down; there is no suspect state.
//! - **Failure signal**: any failed or timed-out peer call marks the target down.
//! - **Re-admission**: only a successful heartbeat ping marks a peer up again
//!   (see `node::heartbeat`).

pub mod tracker;
