use partikv::cluster::config::{ClusterConfig, load_config};
use partikv::cluster::types::NodeId;
use partikv::storage::partitioner::Partitioner;
use partikv::transport::protocol::{
    DeleteRequest, GetRequest, PutRequest, Reply, ServiceCall, ValueReply,
};
use partikv::transport::{HttpPeerClient, PeerClient};

use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_CLUSTER_SIZE: u32 = 3;
const DEFAULT_BASE_PORT: u16 = 50051;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Put { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

impl Command {
    /// `None` for blank lines, `Some(Err(()))` for anything unrecognized.
    fn parse(line: &str) -> Option<Result<Self, ()>> {
        let words: Vec<&str> = line.split_whitespace().collect();

        let command = match words.as_slice() {
            [] => return None,
            ["put", key, value] => Command::Put {
                key: key.to_string(),
                value: value.to_string(),
            },
            ["get", key] => Command::Get {
                key: key.to_string(),
            },
            ["delete", key] => Command::Delete {
                key: key.to_string(),
            },
            _ => return Some(Err(())),
        };

        Some(Ok(command))
    }

    fn key(&self) -> &str {
        match self {
            Command::Put { key, .. } | Command::Get { key } | Command::Delete { key } => key,
        }
    }
}

/// One-line console form of a reply.
trait Render {
    fn render(&self, node: NodeId) -> String;
}

impl Render for Reply {
    fn render(&self, node: NodeId) -> String {
        format!(
            "[Node {}] success={}, message={}",
            node, self.success, self.message
        )
    }
}

impl Render for ValueReply {
    fn render(&self, node: NodeId) -> String {
        // The node answered but could not carry out the lookup.
        if let Some(cause) = &self.error {
            return format!("[Node {}] success=false, message={}", node, cause);
        }

        let status = if self.found { "FOUND" } else { "NOT FOUND" };
        format!("[Node {}] {} value={}", node, status, self.value)
    }
}

/// Tries each target in order and prints the first answer.
async fn send<C>(client: &HttpPeerClient, targets: [NodeId; 3], request: C) -> bool
where
    C: ServiceCall,
    C::Reply: Render,
{
    for target in targets {
        match client.call(target, request.clone()).await {
            Ok(reply) => {
                println!("{}", reply.render(target));
                return true;
            }
            Err(e) => println!("[!] Node {} down ({})", target, e),
        }
    }

    println!("[X] All replicas failed");
    false
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = match args.iter().position(|arg| arg == "--config") {
        Some(i) => {
            let path = args
                .get(i + 1)
                .ok_or_else(|| anyhow::anyhow!("--config needs a value"))?;
            load_config(path)?
        }
        None => ClusterConfig::localhost(DEFAULT_CLUSTER_SIZE, DEFAULT_BASE_PORT),
    };

    let cluster = Arc::new(config.cluster_map()?);
    let partitioner = Partitioner::new(cluster.size());
    let client = HttpPeerClient::new(cluster.clone(), config.timing.call_timeout());

    println!("Commands: put <k> <v> | get <k> | delete <k>");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!(">> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line) {
            None => continue,
            Some(Err(())) => {
                println!("[!] Invalid command");
                continue;
            }
            Some(Ok(command)) => command,
        };

        let targets = partitioner.preference_list(command.key());
        match command {
            Command::Put { key, value } => {
                send(&client, targets, PutRequest { key, value }).await;
            }
            Command::Get { key } => {
                send(&client, targets, GetRequest { key }).await;
            }
            Command::Delete { key } => {
                send(&client, targets, DeleteRequest { key }).await;
            }
        }
    }

    Ok(())
}
