//! Run a query script file against a table.
//!
//! With `--debug` the cluster returns a trace of the compiled script; when the
//! response carries a `debug` field it is printed verbatim.

use anyhow::{Context, Result};
use clap::Parser;
use openset_client::cli::{ConnectionArgs, init_tracing, load_dotenv, print_json};
use openset_client::{OpenSetClient, QueryOptions, SortOrder};
use serde_json::Value;
use std::path::PathBuf;

/// Query an OpenSet table.
#[derive(Parser, Debug)]
#[command(name = "openset-query", disable_help_flag = true)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Table name
    #[arg(short, long)]
    table: String,

    /// File holding the query script
    #[arg(short, long)]
    file: PathBuf,

    /// Debug the script
    #[arg(short, long)]
    debug: bool,

    /// Keep only the first N result rows
    #[arg(long)]
    trim: Option<i64>,

    /// Sort column (`group` sorts by key)
    #[arg(long)]
    sort: Option<String>,

    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let args = Args::parse();
    init_tracing();

    let code = std::fs::read_to_string(&args.file)
        .with_context(|| format!("could not read query file {}", args.file.display()))?;

    let options = QueryOptions {
        debug: args.debug,
        trim: args.trim,
        sort: args.sort.clone(),
        order: args.asc.then_some(SortOrder::Asc),
        ..Default::default()
    };

    let client = OpenSetClient::new(&args.connection.to_config())?;
    tracing::info!("using {}", client.base_url());

    let response = client
        .query_events(&args.table, &code, &options)
        .await
        .context("query failed")?;

    match response.get("debug").and_then(Value::as_str) {
        Some(trace) if args.debug => println!("{}", trace),
        _ => print_json(&response)?,
    }

    Ok(())
}
