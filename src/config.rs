//! Configuration management and validation.
//!
//! Decoder behavior (skip count, malformed calendar policy, flag
//! retention) and pipeline settings (concurrency, parquet output).

use crate::constants::{DEFAULT_MAX_CONCURRENT_FILES, DEFAULT_ROW_GROUP_SIZE};
use crate::error::{DlyError, Result};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do with a row whose year/month cannot form a date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarPolicy {
    /// Abort the whole decode call
    #[default]
    FailFast,
    /// Drop the row and report its index
    SkipRow,
}

/// Settings for a single decode call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Leading lines to discard before slicing
    pub skip_rows: usize,

    pub calendar_policy: CalendarPolicy,

    /// Keep per-day measurement and source flags in the output
    pub retain_auxiliary_flags: bool,
}

impl DecoderConfig {
    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn with_calendar_policy(mut self, policy: CalendarPolicy) -> Self {
        self.calendar_policy = policy;
        self
    }

    pub fn with_auxiliary_flags(mut self) -> Self {
        self.retain_auxiliary_flags = true;
        self
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = DlyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(DlyError::configuration(format!(
                "Unknown compression algorithm '{}'. Expected one of: snappy, zstd, lz4, none",
                other
            ))),
        }
    }
}

/// Global configuration for the `.dly` to parquet pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    pub decoder: DecoderConfig,

    /// Maximum files decoded at the same time
    pub max_concurrent_files: usize,

    pub compression: CompressionAlgorithm,

    /// Enable column statistics for query pruning
    pub enable_statistics: bool,

    /// Rows per parquet row group
    pub row_group_size: usize,

    /// Draw a progress bar while decoding
    pub show_progress: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            decoder: DecoderConfig::default(),
            max_concurrent_files: DEFAULT_MAX_CONCURRENT_FILES.min(num_cpus::get().max(1)),
            compression: CompressionAlgorithm::default(),
            enable_statistics: true,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            show_progress: true,
        }
    }
}

impl ProcessorConfig {
    pub fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_row_group_size(mut self, row_group_size: usize) -> Self {
        self.row_group_size = row_group_size;
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_files == 0 {
            return Err(DlyError::configuration(
                "max_concurrent_files must be at least 1",
            ));
        }
        if self.row_group_size == 0 {
            return Err(DlyError::configuration("row_group_size must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProcessorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.max_concurrent_files >= 1);
        assert_eq!(config.decoder.calendar_policy, CalendarPolicy::FailFast);
        assert_eq!(config.decoder.skip_rows, 0);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = ProcessorConfig::default().with_max_concurrent_files(0);
        assert!(matches!(
            config.validate(),
            Err(DlyError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_row_groups() {
        let config = ProcessorConfig::default().with_row_group_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_compression_from_str() {
        assert_eq!(
            "ZSTD".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Zstd
        );
        assert_eq!(
            "none".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Uncompressed
        );
        assert!("brotli".parse::<CompressionAlgorithm>().is_err());
    }
}
