//! Generic fixed-width text slicing.
//!
//! Reads a line-oriented source as opaque raw lines and cuts each line
//! into named fields at cumulative byte offsets taken from a
//! [`ColumnSpec`]. Every field becomes a whitespace-trimmed `String`
//! column of a polars [`DataFrame`], in declaration order.
//!
//! Short lines yield empty or partial fields and long lines are cut to
//! the declared width; neither is an error.

use crate::error::{DlyError, Result};
use crate::models::ColumnSpec;
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Slice a fixed-width file into a table of trimmed string columns.
pub fn slice_file(path: &Path, spec: &ColumnSpec, skip_rows: usize) -> Result<DataFrame> {
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|e| DlyError::source_unreadable(&source_name, e))?;
    let lines = read_raw_lines(BufReader::new(file), skip_rows, &source_name)?;
    slice_lines(&lines, spec)
}

/// Slice any buffered reader. Used for in-memory sources.
pub fn slice_reader<R: BufRead>(reader: R, spec: &ColumnSpec, skip_rows: usize) -> Result<DataFrame> {
    let lines = read_raw_lines(reader, skip_rows, "<reader>")?;
    slice_lines(&lines, spec)
}

/// Read every line as raw bytes, dropping the first `skip_rows`.
///
/// Line terminators (`\n` or `\r\n`) are removed. Every remaining line is
/// returned, blank ones included, so index `k` is line `k` after the skip.
/// A terminator at the very end of the source does not start a new line.
pub fn read_raw_lines<R: BufRead>(
    mut reader: R,
    skip_rows: usize,
    source_name: &str,
) -> Result<Vec<Vec<u8>>> {
    let mut lines = Vec::new();
    let mut line_num = 0usize;

    loop {
        let mut buf = Vec::new();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| DlyError::source_unreadable(source_name, e))?;
        if read == 0 {
            break;
        }

        line_num += 1;
        if line_num <= skip_rows {
            continue;
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        lines.push(buf);
    }

    Ok(lines)
}

/// Cut already-read lines into one column per layout field.
pub fn slice_lines<L: AsRef<[u8]>>(lines: &[L], spec: &ColumnSpec) -> Result<DataFrame> {
    let columns = spec
        .slices()
        .into_iter()
        .map(|(name, start, width)| {
            let values: Vec<String> = lines
                .iter()
                .map(|line| extract_field(line.as_ref(), start, width))
                .collect();
            Column::new(name.into(), values)
        })
        .collect::<Vec<_>>();

    Ok(DataFrame::new(columns)?)
}

/// Bytes `[start, start + width)` of `line`, clamped to the line end, trimmed.
fn extract_field(line: &[u8], start: usize, width: usize) -> String {
    let end = (start + width).min(line.len());
    let bytes = line.get(start..end).unwrap_or_default();
    String::from_utf8_lossy(bytes).trim().to_string()
}
