//! Create a table from a JSON column file.
//!
//! The file must hold a JSON array of column definitions:
//!
//! ```json
//! [
//!     { "name": "product_name", "type": "text" },
//!     { "name": "product_tags", "type": "text", "is_set": true },
//!     { "name": "total", "type": "double" }
//! ]
//! ```

use anyhow::{Context, Result, bail};
use clap::Parser;
use openset_client::OpenSetClient;
use openset_client::cli::{ConnectionArgs, init_tracing, load_dotenv, print_json};
use openset_core::ColumnDef;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Create an OpenSet table.
#[derive(Parser, Debug)]
#[command(name = "openset-create-table", disable_help_flag = true)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Table name (letters, digits and underscore)
    #[arg(short, long)]
    table: String,

    /// JSON file with the column definitions
    #[arg(short, long)]
    json: PathBuf,
}

fn read_columns(path: &Path) -> Result<Vec<ColumnDef>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not open JSON table file {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    if !value.is_array() {
        bail!("JSON data must be an array");
    }

    serde_json::from_value(value).context("invalid column definition")
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let args = Args::parse();
    init_tracing();

    let columns = read_columns(&args.json)?;
    let client = OpenSetClient::new(&args.connection.to_config())?;
    tracing::info!("using {}", client.base_url());

    let response = client
        .create_table(&args.table, &columns)
        .await
        .context("create_table failed")?;

    print_json(&response)?;
    println!("+ done");
    Ok(())
}
