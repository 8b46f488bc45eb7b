//! Cluster Topology Module
//!
//! Static description of the cluster: which node ids exist, where they listen,
//! and the fixed timing parameters every node agrees on.
//!
//! ## Core Concepts
//! - **ClusterMap**: `NodeId -> address`, identical on every node and read-only after startup.
//! - **ClusterConfig**: the on-disk JSON form the map is loaded from, plus timing and pool size.
//! - **Timing**: call timeout, heartbeat period and recovery delay.

pub mod config;
pub mod types;
