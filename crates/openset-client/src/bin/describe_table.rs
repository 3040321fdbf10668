//! Print a table's column definitions.

use anyhow::{Context, Result};
use clap::Parser;
use openset_client::OpenSetClient;
use openset_client::cli::{ConnectionArgs, init_tracing, load_dotenv, print_json};

/// Describe an OpenSet table.
#[derive(Parser, Debug)]
#[command(name = "openset-describe-table", disable_help_flag = true)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Table name
    #[arg(short, long)]
    table: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let args = Args::parse();
    init_tracing();

    let client = OpenSetClient::new(&args.connection.to_config())?;
    let response = client
        .describe_table(&args.table)
        .await
        .context("describe_table failed")?;

    print_json(&response)?;
    Ok(())
}
