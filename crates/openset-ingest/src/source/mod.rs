//! Line source: streams raw lines from a directory of JSONL files.
//!
//! Files are read one at a time in ascending file-name order, each strictly
//! top to bottom, so the sequence of lines handed to the parser is a single
//! global FIFO across the whole input.
//!
//! The source can be paused and resumed through [`SourceControl`], which the
//! bounded queue drives via [`FlowControl`]. A paused source finishes handing
//! over its current line and then waits before reading the next one, so no
//! line is lost or duplicated across a pause.

mod parser;

pub use parser::{ParseOutcome, parse_line};

use crate::error::{Error, Result};
use crate::pipeline::{FlowControl, PipelineState};
use openset_core::metrics::increment;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;

/// Lines handed over between cooperative yields.
const YIELD_EVERY_LINES: u64 = 1024;

/// Pause flag shared between the queue (writer) and the source (reader).
#[derive(Debug, Default)]
pub struct SourceControl {
    paused: AtomicBool,
    resumed: Notify,
}

impl SourceControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Wait until the source is not paused. Returns immediately if running.
    pub async fn wait_until_resumed(&self) {
        loop {
            // Register before checking the flag so a resume in between is not missed.
            let notified = self.resumed.notified();
            if !self.is_paused() {
                return;
            }
            notified.await;
        }
    }
}

impl FlowControl for SourceControl {
    fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resumed.notify_waiters();
    }
}

/// One raw line, terminator stripped.
#[derive(Debug, Clone, Copy)]
pub struct SourceLine<'a> {
    pub path: &'a Path,
    /// 1-based line number within `path`.
    pub number: u64,
    pub bytes: &'a [u8],
}

/// Statistics from reading the whole input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub lines_read: u64,
    pub bytes_read: u64,
}

/// List the files to read: every regular file of a directory sorted by name,
/// or the path itself when it is a file.
pub async fn collect_files(input: &Path) -> Result<Vec<PathBuf>> {
    let enumeration_error = |source| Error::SourceEnumeration {
        path: input.to_path_buf(),
        source,
    };

    let metadata = tokio::fs::metadata(input)
        .await
        .map_err(enumeration_error)?;

    if metadata.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut entries = tokio::fs::read_dir(input)
        .await
        .map_err(enumeration_error)?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(enumeration_error)? {
        let path = entry.path();
        // Follows symlinks; dangling links and subdirectories are skipped.
        if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Sequential reader over an enumerated set of files.
pub struct LineSource {
    files: Vec<PathBuf>,
    control: Arc<SourceControl>,
}

impl LineSource {
    /// Enumerate `input`. Fails if the path cannot be listed.
    pub async fn open(input: &Path, control: Arc<SourceControl>) -> Result<Self> {
        let files = collect_files(input).await?;
        tracing::info!("Found {} source files in {}", files.len(), input.display());
        Ok(Self { files, control })
    }

    /// Files in the order they will be read.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Stream every line to `on_line`, honouring pause requests between lines.
    ///
    /// Unreadable files are logged and skipped. The state is marked exhausted
    /// exactly once when this future completes or is dropped.
    pub async fn run<F>(self, state: &PipelineState, mut on_line: F) -> SourceStats
    where
        F: FnMut(SourceLine<'_>),
    {
        let _exhausted = ExhaustedGuard(state);
        let mut stats = SourceStats::default();

        for path in &self.files {
            match self.read_file(path, state, &mut on_line, &mut stats).await {
                Ok(lines) => {
                    stats.files_processed += 1;
                    increment("ingest_files_total", 1);
                    tracing::debug!("Finished {} ({} lines)", path.display(), lines);
                }
                Err(e) => {
                    stats.files_failed += 1;
                    increment("ingest_files_failed_total", 1);
                    tracing::warn!("Skipping rest of {}: {}", path.display(), e);
                }
            }
        }

        stats
    }

    async fn read_file<F>(
        &self,
        path: &Path,
        state: &PipelineState,
        on_line: &mut F,
        stats: &mut SourceStats,
    ) -> std::io::Result<u64>
    where
        F: FnMut(SourceLine<'_>),
    {
        let file = File::open(path).await?;
        let mut reader = BufReader::new(file);
        let mut buf = Vec::with_capacity(4096);
        let mut number = 0u64;
        let mut file_bytes = 0u64;

        let result = loop {
            self.control.wait_until_resumed().await;

            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break Ok(number),
                Ok(_) => {}
                Err(e) => break Err(e),
            }

            let line = trim_terminator(&buf);
            number += 1;
            file_bytes += line.len() as u64 + 1;
            state.record_line(line.len());

            on_line(SourceLine {
                path,
                number,
                bytes: line,
            });

            if number % YIELD_EVERY_LINES == 0 {
                tokio::task::yield_now().await;
            }
        };

        stats.lines_read += number;
        stats.bytes_read += file_bytes;
        increment("ingest_lines_total", number);
        increment("ingest_bytes_total", file_bytes);

        result
    }
}

/// Strip a trailing `\n` and then a trailing `\r`.
fn trim_terminator(buf: &[u8]) -> &[u8] {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    line.strip_suffix(b"\r").unwrap_or(line)
}

struct ExhaustedGuard<'a>(&'a PipelineState);

impl Drop for ExhaustedGuard<'_> {
    fn drop(&mut self) {
        if self.0.mark_exhausted() {
            tracing::debug!("Line source exhausted");
        }
    }
}
