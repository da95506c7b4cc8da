//! GHCN-Daily Processor Library
//!
//! Decodes GHCN-Daily `.dly` climate observation files into a typed
//! monthly table.
//!
//! This library provides tools for:
//! - Slicing fixed-width text into named, trimmed string columns
//! - Folding the 31 per-day fields of a `.dly` line into ordered value
//!   and quality-flag sequences
//! - Deriving each record's month start and true day count, leap years
//!   included
//! - Converting whole station archives to a single Parquet file

pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod models;
pub mod processor;
pub mod slicer;

pub use config::{CalendarPolicy, DecoderConfig, ProcessorConfig};
pub use decoder::{decode, decode_reader, decode_records, dly_column_spec, records_to_frame};
pub use error::{ConversionError, DlyError, Result};
pub use models::{ColumnSpec, DecodedBatch, MonthlyStationRecord};
pub use slicer::{slice_file, slice_reader};
