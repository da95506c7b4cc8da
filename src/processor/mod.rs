//! Multi-file processing pipeline.
//!
//! Discovers `.dly` files, decodes them on blocking tasks with bounded
//! concurrency, and writes every record to a single Parquet file.
//! Output keeps file order (sorted by path) and line order within a file.

pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{discovery::FileDiscovery, writer::ParquetWriter};

use crate::config::ProcessorConfig;
use crate::constants::DEFAULT_OUTPUT_STEM;
use crate::decoder::{decode_records, records_to_frame};
use crate::error::{DlyError, Result};
use crate::models::{DecodedBatch, ProcessingStats};

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, info, warn};

/// Main processor for `.dly` to Parquet conversion
#[derive(Debug)]
pub struct DlyProcessor {
    input_path: PathBuf,
    output_path: PathBuf,
    config: ProcessorConfig,
    file_discovery: FileDiscovery,
}

/// Default output location: `<input stem>.parquet` beside the input.
/// Inputs without a stem (`.`, `..`, `/`) fall back to `ghcnd.parquet`.
pub fn default_output_path(input_path: &Path) -> PathBuf {
    let name = input_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| DEFAULT_OUTPUT_STEM.to_string());

    input_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{}.parquet", name))
}

impl DlyProcessor {
    /// Create a new processor
    pub fn new(input_path: PathBuf, output_path: Option<PathBuf>) -> Result<Self> {
        if !input_path.exists() {
            return Err(DlyError::InputNotFound { path: input_path });
        }

        let output_path = output_path.unwrap_or_else(|| default_output_path(&input_path));

        Ok(Self {
            file_discovery: FileDiscovery::new(input_path.clone()),
            input_path,
            output_path,
            config: ProcessorConfig::default(),
        })
    }

    /// Configure the processor
    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.config = config;
        self
    }

    /// Main processing entry point
    pub async fn process(&mut self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        self.config.validate()?;

        info!(
            "Processing {} -> {}",
            self.input_path.display(),
            self.output_path.display()
        );

        let files = self.file_discovery.discover_dly_files()?;
        info!(
            "Found {} .dly files from {} stations",
            files.len(),
            self.file_discovery.station_count()
        );

        if files.is_empty() {
            warn!("No .dly files found under {}", self.input_path.display());
            return Ok(ProcessingStats {
                output_path: self.output_path.clone(),
                processing_time_ms: start_time.elapsed().as_millis(),
                ..Default::default()
            });
        }

        let outcomes = self.decode_files(&files).await;

        let mut stats = ProcessingStats {
            output_path: self.output_path.clone(),
            ..Default::default()
        };
        let mut records = Vec::new();
        let mut first_error = None;

        for (path, outcome) in files.iter().zip(outcomes) {
            match outcome {
                Ok(batch) => {
                    if !batch.skipped_rows.is_empty() {
                        warn!(
                            "Skipped {} rows with malformed year/month in {}: {:?}",
                            batch.skipped_rows.len(),
                            path.display(),
                            batch.skipped_rows
                        );
                    }
                    stats.files_processed += 1;
                    stats.rows_skipped += batch.skipped_rows.len();
                    records.extend(batch.records);
                }
                Err(e) => {
                    error!("Failed to decode {}: {:#}", path.display(), e);
                    stats.files_failed += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        if stats.files_processed == 0 {
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        let mut df = records_to_frame(&records, self.config.decoder.retain_auxiliary_flags)?;
        drop(records);

        let writer = ParquetWriter::new(self.output_path.clone(), self.config.clone());
        stats.total_records = writer.write(&mut df)?;
        stats.processing_time_ms = start_time.elapsed().as_millis();

        debug!(
            "Processed {} files ({} failed), {} records in {}ms",
            stats.files_processed, stats.files_failed, stats.total_records, stats.processing_time_ms
        );

        Ok(stats)
    }

    /// Decode every file on the blocking pool. Results come back in input order.
    async fn decode_files(&self, files: &[PathBuf]) -> Vec<Result<DecodedBatch>> {
        let pb = if self.config.show_progress {
            ProgressBar::new(files.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("Decoding files");

        let concurrent_limit = self.config.max_concurrent_files.min(files.len()).max(1);
        debug!("Decoding with concurrency {}", concurrent_limit);

        let results = stream::iter(files.iter().cloned())
            .map(|file_path| {
                let decoder_config = self.config.decoder.clone();
                let pb = pb.clone();
                async move {
                    if let Some(file_name) = file_path.file_name() {
                        pb.set_message(format!("Decoding: {}", file_name.to_string_lossy()));
                    }

                    let result = task::spawn_blocking({
                        let file_path = file_path.clone();
                        move || decode_records(&file_path, &decoder_config)
                    })
                    .await
                    .map_err(|e| DlyError::ProcessingFailed {
                        path: file_path.clone(),
                        reason: format!("Decode task failed: {}", e),
                    })
                    .and_then(|result| result);

                    pb.inc(1);
                    result
                }
            })
            .buffered(concurrent_limit)
            .collect::<Vec<_>>()
            .await;

        pb.finish_with_message("All .dly files decoded");
        results
    }
}
