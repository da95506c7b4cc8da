//! Core data structures for GHCN-Daily processing.
//!
//! Defines the fixed-width column layout, the decoded monthly record,
//! and the statistics reported by the pipeline.

use crate::error::{DlyError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Ordered fixed-width column layout.
///
/// Field order is significant: the byte offset of field `i` is the sum of
/// the widths of fields `0..i`. Every width is at least one byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    fields: Vec<(String, NonZeroUsize)>,
}

impl ColumnSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layout from `(name, width)` pairs, rejecting zero widths
    pub fn from_fields<S, I>(fields: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, usize)>,
    {
        let mut spec = Self::new();
        for (name, width) in fields {
            spec.push(name, width)?;
        }
        Ok(spec)
    }

    /// Append a field whose width is known to be positive, builder style
    pub fn with_width(mut self, name: impl Into<String>, width: NonZeroUsize) -> Self {
        self.fields.push((name.into(), width));
        self
    }

    /// Append a field, builder style
    pub fn with_field(mut self, name: impl Into<String>, width: usize) -> Result<Self> {
        self.push(name, width)?;
        Ok(self)
    }

    pub fn push(&mut self, name: impl Into<String>, width: usize) -> Result<()> {
        let name = name.into();
        let width = NonZeroUsize::new(width).ok_or_else(|| {
            DlyError::configuration(format!("field '{}' must be at least one byte wide", name))
        })?;
        self.fields.push((name, width));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sum of all field widths
    pub fn total_width(&self) -> usize {
        self.fields.iter().map(|(_, width)| width.get()).sum()
    }

    /// Each field with its cumulative start offset: `(name, start, width)`
    pub fn slices(&self) -> Vec<(&str, usize, usize)> {
        let mut start = 0;
        self.fields
            .iter()
            .map(|(name, width)| {
                let slice = (name.as_str(), start, width.get());
                start += width.get();
                slice
            })
            .collect()
    }
}

/// One station/element/month line of a `.dly` file, decoded.
///
/// `daily_values` and `qc_flags` always hold 31 slots (slot = day - 1).
/// Only the first `days_in_month` slots describe real days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStationRecord {
    pub station: String,
    pub element: String,
    pub year_month: String,
    pub daily_values: Vec<Option<f32>>,
    pub qc_flags: Vec<String>,
    /// Present only when auxiliary flags are retained
    pub measurement_flags: Option<Vec<String>>,
    pub source_flags: Option<Vec<String>>,
    /// Day 1 of the record's month
    pub date: NaiveDate,
    pub days_in_month: u32,
}

impl MonthlyStationRecord {
    /// Values for the days that exist in this month
    pub fn valid_values(&self) -> &[Option<f32>] {
        let end = (self.days_in_month as usize).min(self.daily_values.len());
        &self.daily_values[..end]
    }
}

/// Records decoded from one source, plus the rows dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct DecodedBatch {
    pub records: Vec<MonthlyStationRecord>,
    /// Zero-based row indices (after skip) rejected for malformed year/month
    pub skipped_rows: Vec<usize>,
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_records: usize,
    pub rows_skipped: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}
