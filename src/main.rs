use partikv::cluster::config::{ClusterConfig, load_config};
use partikv::cluster::types::NodeId;
use partikv::node::KvNode;
use partikv::transport::{HttpPeerClient, router};
use std::sync::Arc;

const DEFAULT_CLUSTER_SIZE: u32 = 3;
const DEFAULT_BASE_PORT: u16 = 50051;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} --id <node-id> [--config <cluster.json>]", args[0]);
        eprintln!("Example: {} --id 0", args[0]);
        eprintln!("Example: {} --id 2 --config cluster.json", args[0]);

        std::process::exit(1);
    }

    let mut node_id: Option<NodeId> = None;
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--id" => {
                let raw = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow::anyhow!("--id needs a value"))?;
                node_id = Some(NodeId(raw.parse()?));
                i += 2;
            }
            "--config" => {
                let raw = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow::anyhow!("--config needs a value"))?;
                config_path = Some(raw.clone());
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let node_id = node_id.ok_or_else(|| anyhow::anyhow!("--id is required"))?;

    let config = match &config_path {
        Some(path) => {
            tracing::info!("Loading cluster config from {}", path);
            load_config(path)?
        }
        None => {
            tracing::info!(
                "No --config given, using {} local nodes from port {}",
                DEFAULT_CLUSTER_SIZE,
                DEFAULT_BASE_PORT
            );
            ClusterConfig::localhost(DEFAULT_CLUSTER_SIZE, DEFAULT_BASE_PORT)
        }
    };

    // 1. Topology:
    let cluster = Arc::new(config.cluster_map()?);
    let address = cluster
        .address(node_id)
        .ok_or_else(|| anyhow::anyhow!("node {} missing from cluster config", node_id))?
        .to_string();

    // 2. Node engine:
    let peers = Arc::new(HttpPeerClient::new(
        cluster.clone(),
        config.timing.call_timeout(),
    ));
    let node = KvNode::new(node_id, cluster.clone(), config.timing.clone(), peers)?;

    // 3. Listener first, so peers can reach us while recovery runs:
    let listener = tokio::net::TcpListener::bind(&address).await?;

    // 4. Background tasks:
    let _heartbeat = node.spawn_heartbeat();
    let _recovery = node.spawn_recovery();

    // 5. RPC server:
    let app = router(node.clone(), config.max_in_flight);

    tracing::info!("Node {} running at {} (cluster of {})", node_id, address, cluster.size());
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
