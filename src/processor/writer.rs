//! Parquet writing module for decoded GHCN-Daily tables

use crate::config::ProcessorConfig;
use crate::error::{DlyError, Result};

use polars::prelude::{DataFrame, ParquetWriter as PolarsParquetWriter, StatisticsOptions};
use std::path::PathBuf;
use tracing::debug;

/// Parquet writer configured from [`ProcessorConfig`]
#[derive(Debug)]
pub struct ParquetWriter {
    output_path: PathBuf,
    config: ProcessorConfig,
}

impl ParquetWriter {
    /// Create a new Parquet writer
    pub fn new(output_path: PathBuf, config: ProcessorConfig) -> Self {
        Self {
            output_path,
            config,
        }
    }

    /// Write the table, creating the parent directory if needed.
    /// Returns the number of rows written.
    pub fn write(&self, df: &mut DataFrame) -> Result<usize> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| DlyError::WriteFailed {
                    path: self.output_path.clone(),
                    reason: format!("Failed to create output directory: {}", e),
                })?;
            }
        }

        let file = std::fs::File::create(&self.output_path).map_err(|e| DlyError::WriteFailed {
            path: self.output_path.clone(),
            reason: e.to_string(),
        })?;

        let statistics = if self.config.enable_statistics {
            StatisticsOptions::full()
        } else {
            StatisticsOptions::empty()
        };

        debug!(
            "Parquet write config: compression={:?}, row_group_size={}, statistics={}",
            self.config.compression, self.config.row_group_size, self.config.enable_statistics
        );

        PolarsParquetWriter::new(file)
            .with_compression(self.config.compression.to_polars_compression())
            .with_statistics(statistics)
            .with_row_group_size(Some(self.config.row_group_size))
            .finish(df)
            .map_err(|e| DlyError::WriteFailed {
                path: self.output_path.clone(),
                reason: format!("Failed to write parquet: {}", e),
            })?;

        debug!(
            "Wrote {} rows to {}",
            df.height(),
            self.output_path.display()
        );

        Ok(df.height())
    }
}
