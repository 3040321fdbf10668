//! Initialize a fresh node as a cluster.
//!
//! For a single node the partition count should match the number of cores.
//! For a multi-node cluster it should be 10-20% higher than the number of
//! cores that will ultimately be in the cluster.
//!
//! ```bash
//! openset-init-cluster -h 127.0.0.1 -p 2020 -n 16
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use openset_client::OpenSetClient;
use openset_client::cli::{ConnectionArgs, init_tracing, load_dotenv, print_json};

/// Initialize an OpenSet cluster.
#[derive(Parser, Debug)]
#[command(name = "openset-init-cluster", disable_help_flag = true)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Number of partitions
    #[arg(short = 'n', long = "num", value_parser = clap::value_parser!(u32).range(1..))]
    partitions: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let args = Args::parse();
    init_tracing();

    let client = OpenSetClient::new(&args.connection.to_config())?;
    tracing::info!("using {}", client.base_url());

    let response = client
        .init_cluster(args.partitions)
        .await
        .context("init_cluster failed")?;

    print_json(&response)?;
    println!("+ done");
    Ok(())
}
