//! Print node and cluster status.

use anyhow::{Context, Result};
use clap::Parser;
use openset_client::OpenSetClient;
use openset_client::cli::{ConnectionArgs, init_tracing, load_dotenv, print_json};

/// Show OpenSet node status.
#[derive(Parser, Debug)]
#[command(name = "openset-status", disable_help_flag = true)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let args = Args::parse();
    init_tracing();

    let client = OpenSetClient::new(&args.connection.to_config())?;
    let response = client.status().await.context("status failed")?;

    print_json(&response)?;
    Ok(())
}
