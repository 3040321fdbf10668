//! Insert a directory of line-delimited JSON events into an OpenSet table.
//!
//! Every file in the input directory is read in name order; each line is one
//! event. Events are sent in batches of up to 1000, one request at a time,
//! while reading is paused whenever too many events are waiting.
//!
//! # Usage
//!
//! ```bash
//! openset-insert -h 127.0.0.1 -p 2020 -t highstreet -j ./events/
//!
//! # With metrics exposed on :9091
//! openset-insert -t highstreet -j ./events/ --metrics-port 9091
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use metrics::gauge;
use openset_client::OpenSetClient;
use openset_client::cli::{ConnectionArgs, init_tracing, load_dotenv, load_dotenv_from};
use openset_core::metrics::{init_metrics, start_metrics_server};
use openset_ingest::pipeline::group_thousands;
use openset_ingest::{HttpSink, IngestConfig, IngestPipeline, PipelineSummary};
use std::fmt::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Insert JSONL events into an OpenSet table.
#[derive(Parser, Debug)]
#[command(name = "openset-insert", disable_help_flag = true)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Table name
    #[arg(short, long, env = "OPENSET_TABLE")]
    table: String,

    /// Directory (or single file) of line-delimited JSON events
    #[arg(short, long)]
    json: PathBuf,

    /// Events per insert request (at most 1000)
    #[arg(long, default_value = "1000")]
    batch_size: usize,

    /// Pause reading once this many events are queued
    #[arg(long, default_value = "50000")]
    high_watermark: usize,

    /// Resume reading once fewer than this many events are queued
    #[arg(long, default_value = "25000")]
    resume_watermark: usize,

    /// Queue at least this many events before sending while input remains
    #[arg(long, default_value = "5000")]
    low_batch_threshold: usize,

    /// Queue poll interval in milliseconds
    #[arg(long, default_value = "50")]
    poll_ms: u64,

    /// Metrics HTTP server port (0 to disable)
    #[arg(long, env = "OPENSET_METRICS_PORT", default_value = "0")]
    metrics_port: u16,

    /// Load environment variables from this file instead of ./.env
    #[arg(long)]
    dotenv: Option<PathBuf>,
}

impl Args {
    fn ingest_config(&self) -> IngestConfig {
        IngestConfig {
            input: self.json.clone(),
            table: self.table.clone(),
            max_batch_size: self.batch_size,
            high_watermark: self.high_watermark,
            resume_watermark: self.resume_watermark,
            low_batch_threshold: self.low_batch_threshold,
            poll_interval: Duration::from_millis(self.poll_ms),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let mut args = Args::parse();
    if let Some(path) = args.dotenv.clone() {
        load_dotenv_from(&path)
            .with_context(|| format!("could not load env file {}", path.display()))?;
        // Re-parse so env fallbacks see the file's values.
        args = Args::parse();
    }
    init_tracing();

    if args.metrics_port > 0 {
        let metrics_handle = init_metrics();
        start_metrics_server(args.metrics_port, metrics_handle)
            .await
            .context("could not start metrics server")?;
    }

    let client = OpenSetClient::new(&args.connection.to_config())?;
    tracing::info!("using {}", client.base_url());

    let pipeline = IngestPipeline::new(args.ingest_config(), HttpSink::new(client))
        .context("invalid ingest settings")?;

    gauge!("ingest_running").set(1.0);
    let result = pipeline.run().await;
    gauge!("ingest_running").set(0.0);

    let summary = result.context("ingestion aborted")?;
    print_summary(&args, &summary);

    Ok(())
}

fn print_summary(args: &Args, summary: &PipelineSummary) {
    print!("{}", format_summary(args, summary));
}

fn format_summary(args: &Args, summary: &PipelineSummary) -> String {
    let progress = &summary.progress;
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "\n══════════════════════════════════════════════════════════════════");
    let _ = writeln!(out, "SUMMARY");
    let _ = writeln!(out, "══════════════════════════════════════════════════════════════════\n");

    let _ = writeln!(out, "Input:       {}", args.json.display());
    let _ = writeln!(out, "Table:       {}", args.table);
    let _ = writeln!(out);
    let _ = writeln!(out, "Files read:        {:>12}", summary.source.files_processed);
    if summary.source.files_failed > 0 {
        let _ = writeln!(out, "Files failed:      {:>12}", summary.source.files_failed);
    }
    let _ = writeln!(out, "Lines read:        {:>12}", progress.lines_read);
    let _ = writeln!(out, "Bytes read:        {:>12}", progress.bytes_read);
    let _ = writeln!(out, "Malformed lines:   {:>12}", progress.lines_malformed);
    let _ = writeln!(out);
    let _ = writeln!(out, "Batches sent:      {:>12}", progress.batches_sent);
    let _ = writeln!(out, "Batches failed:    {:>12}", progress.batches_failed);
    let _ = writeln!(out, "Events delivered:  {:>12}", progress.events_delivered);
    if progress.events_failed > 0 {
        let _ = writeln!(out, "Events failed:     {:>12}", progress.events_failed);
    }
    let _ = writeln!(out, "Queue peak:        {:>12}", summary.queue.max_depth);
    let _ = writeln!(out, "Source pauses:     {:>12}", summary.queue.pauses);
    let _ = writeln!(out);
    let _ = writeln!(out, "Elapsed:           {:>11.1}s", summary.rate.elapsed_secs);
    let _ = writeln!(
        out,
        "Throughput:        {:>12} lines/sec, {} bytes/sec",
        group_thousands(summary.rate.events_per_sec.round() as u64),
        group_thousands(summary.rate.bytes_per_sec.round() as u64)
    );

    out
}
