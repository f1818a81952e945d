mod config;
mod nodes;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use config::Config;
use log::{info, LevelFilter};
use std::sync::Arc;
use storage::{HttpHealthProbe, NodeSelector, RendezvousHash};

#[derive(Parser)]
#[command(name = "selector")]
#[command(about = "Storage node selection by health and rendezvous hashing")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe candidates and print the selected endpoints, best first
    Select {
        /// JSON file with the candidate storage nodes (overrides config)
        #[arg(long)]
        nodes: Option<String>,

        /// Number of nodes to sample and return, 0 for all healthy nodes (overrides config)
        #[arg(short = 'n', long)]
        num_nodes: Option<usize>,

        /// Rendezvous key such as a CID or wallet (overrides config)
        #[arg(short = 'k', long)]
        key: Option<String>,

        /// Health check timeout in seconds (overrides config)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Order wallets by rendezvous weight for a key without probing anything
    Rank {
        /// Rendezvous key
        #[arg(short = 'k', long)]
        key: String,

        /// Number of wallets to print, all by default
        #[arg(short = 'n', long)]
        num: Option<usize>,

        /// Participant wallets
        #[arg(required = true)]
        wallets: Vec<String>,
    },
    /// Probe a single endpoint's status route
    Check {
        endpoint: String,

        /// Health check timeout in seconds (overrides config)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .format_timestamp(None)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Select {
            nodes,
            num_nodes,
            key,
            timeout_secs,
        } => {
            if let Some(timeout_secs) = timeout_secs {
                config.health_check_timeout_secs = timeout_secs;
            }
            let nodes_file = nodes.or(config.nodes_file.clone()).ok_or_else(|| {
                anyhow!("No nodes file configured. Use --nodes or set SELECTOR_NODES_FILE")
            })?;
            let num_nodes = num_nodes.unwrap_or(config.num_nodes);
            let key = key.or(config.rendezvous_key.clone()).unwrap_or_default();

            let candidates = nodes::load_nodes(&nodes_file)?;
            info!(
                "Selecting {} of {} storage nodes{}",
                if num_nodes == 0 {
                    "all".to_string()
                } else {
                    num_nodes.to_string()
                },
                candidates.len(),
                if key.is_empty() {
                    String::new()
                } else {
                    format!(" for key {key}")
                }
            );

            let probe = HttpHealthProbe::new(config.health_check_timeout());
            let selector = NodeSelector::new(Arc::new(probe));
            let selected = selector
                .get_n_storage_nodes(&candidates, num_nodes, &key)
                .await;

            if selected.is_empty() {
                bail!("No healthy storage nodes available");
            }
            for endpoint in selected {
                println!("{endpoint}");
            }
        }
        Commands::Rank { key, num, wallets } => {
            let hash = RendezvousHash::new(wallets);
            let n = num.unwrap_or(hash.len());
            for wallet in hash.get_n(n, &key) {
                let score = RendezvousHash::score(wallet, &key);
                println!("{wallet}\t{}", hex::encode(score.to_be_bytes()));
            }
        }
        Commands::Check {
            endpoint,
            timeout_secs,
        } => {
            if let Some(timeout_secs) = timeout_secs {
                config.health_check_timeout_secs = timeout_secs;
            }
            let probe = HttpHealthProbe::new(config.health_check_timeout());
            let selector = NodeSelector::new(Arc::new(probe));
            if selector.is_node_healthy(&endpoint).await {
                println!("{endpoint} healthy");
            } else {
                println!("{endpoint} unhealthy");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
