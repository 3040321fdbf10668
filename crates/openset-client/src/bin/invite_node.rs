//! Invite a new node into the cluster.

use anyhow::{Context, Result};
use clap::Parser;
use openset_client::OpenSetClient;
use openset_client::cli::{ConnectionArgs, init_tracing, load_dotenv, print_json};

/// Invite a node to join an OpenSet cluster.
#[derive(Parser, Debug)]
#[command(name = "openset-invite-node", disable_help_flag = true)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Address of the node to invite
    #[arg(short = 'n', long)]
    newhost: String,

    /// HTTP port of the node to invite
    #[arg(short = 'o', long)]
    newport: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let args = Args::parse();
    init_tracing();

    let client = OpenSetClient::new(&args.connection.to_config())?;
    tracing::info!("using {}", client.base_url());

    let response = client
        .invite_node(&args.newhost, args.newport)
        .await
        .context("invite_node failed")?;

    print_json(&response)?;
    println!("+ done");
    Ok(())
}
