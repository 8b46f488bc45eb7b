//! Local Storage Module
//!
//! The node-local half of the key/value store.
//!
//! ## Core Concepts
//! - **Partitioning**: `Partitioner` hashes a key to its owning node; the owner's two
//!   successors hold its replicas.
//! - **Local Store**: `LocalStore` is the lock-guarded table each node reads and writes.
//!   Nothing here talks to the network; replication lives in `node`.

pub mod memory;
pub mod partitioner;

#[cfg(test)]
mod tests;
