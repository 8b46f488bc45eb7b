use super::types::{ClusterMap, NodeAddress, NodeId};
use crate::error::{KvError, Result};
use crate::storage::partitioner::REPLICATION_FACTOR;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::time::Duration;

const DEFAULT_CALL_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_HEARTBEAT_INTERVAL_MS: u64 = 5_000;
const DEFAULT_RECOVERY_DELAY_MS: u64 = 1_000;
const DEFAULT_MAX_IN_FLIGHT: usize = 10;

/// Timing parameters shared by every node of a cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Timing {
    /// Upper bound on every outbound peer call.
    pub call_timeout_ms: u64,
    /// Period of the heartbeat loop.
    pub heartbeat_interval_ms: u64,
    /// Delay before the one-shot recovery procedure starts.
    pub recovery_delay_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            call_timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
            heartbeat_interval_ms: DEFAULT_HEARTBEAT_INTERVAL_MS,
            recovery_delay_ms: DEFAULT_RECOVERY_DELAY_MS,
        }
    }
}

impl Timing {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn recovery_delay(&self) -> Duration {
        Duration::from_millis(self.recovery_delay_ms)
    }
}

/// On-disk cluster configuration (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub nodes: Vec<NodeAddress>,
    #[serde(default)]
    pub timing: Timing,
    /// Maximum number of RPCs a node handles concurrently.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

fn default_max_in_flight() -> usize {
    DEFAULT_MAX_IN_FLIGHT
}

impl ClusterConfig {
    /// `count` nodes on 127.0.0.1 with consecutive ports starting at `base_port`.
    pub fn localhost(count: u32, base_port: u16) -> Self {
        let nodes = (0..count)
            .map(|i| NodeAddress {
                id: NodeId(i),
                addr: format!("127.0.0.1:{}", base_port + i as u16),
            })
            .collect();

        Self {
            nodes,
            timing: Timing::default(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Validates the node list and builds the immutable [`ClusterMap`].
    ///
    /// Node ids must be exactly `0..N` (in any order) and `N` must be large
    /// enough to hold an owner plus two distinct replicas. The call timeout and
    /// heartbeat period must be non-zero; a recovery delay of zero is allowed.
    pub fn cluster_map(&self) -> Result<ClusterMap> {
        if self.nodes.len() < REPLICATION_FACTOR {
            return Err(KvError::Config(format!(
                "cluster needs at least {} nodes, got {}",
                REPLICATION_FACTOR,
                self.nodes.len()
            )));
        }

        let mut nodes = BTreeMap::new();
        for node in &self.nodes {
            if node.addr.trim().is_empty() {
                return Err(KvError::Config(format!("node {} has an empty address", node.id)));
            }
            if nodes.insert(node.id, node.addr.trim().to_string()).is_some() {
                return Err(KvError::Config(format!("duplicate node id {}", node.id)));
            }
        }

        let size = nodes.len() as u32;
        if let Some(out_of_range) = nodes.keys().find(|id| id.0 >= size) {
            return Err(KvError::Config(format!(
                "node id {} outside of [0, {})",
                out_of_range, size
            )));
        }

        if self.max_in_flight == 0 {
            return Err(KvError::Config("max_in_flight must be positive".into()));
        }
        if self.timing.call_timeout_ms == 0 {
            return Err(KvError::Config("call_timeout_ms must be positive".into()));
        }
        if self.timing.heartbeat_interval_ms == 0 {
            return Err(KvError::Config(
                "heartbeat_interval_ms must be positive".into(),
            ));
        }

        Ok(ClusterMap::from_validated(nodes))
    }
}

/// Loads a cluster configuration from a JSON file.
pub fn load_config(path: &str) -> Result<ClusterConfig> {
    let data = fs::read_to_string(path)?;
    let config: ClusterConfig = serde_json::from_str(&data)?;
    Ok(config)
}
