//! Error handling for GHCN-Daily decoding operations.
//!
//! Two failure kinds are structural and fatal for a decode call:
//! an unreadable source and a year/month pair that cannot form a date.
//! Everything else degrades to null or empty values inside the table.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DlyError {
    #[error("Source unreadable: {source_name}")]
    SourceUnreadable {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed calendar field at row {row}: year '{year}', month '{month}'")]
    MalformedCalendarField {
        row: usize,
        year: String,
        month: String,
    },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Failed to write output {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DlyError {
    pub fn source_unreadable(source_name: impl Into<String>, source: std::io::Error) -> Self {
        Self::SourceUnreadable {
            source_name: source_name.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Failure to read a single day-value cell as a number.
///
/// Never escapes the decoder: it is collapsed to a null entry in
/// `daily_values`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("empty value")]
    Empty,

    #[error("not a number: '{0}'")]
    NotNumeric(String),
}

pub type Result<T> = std::result::Result<T, DlyError>;
