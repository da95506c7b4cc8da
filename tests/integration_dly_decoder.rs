//! Integration tests for GHCN-Daily decoding through the public API
//!
//! Each test writes a synthetic `.dly` file to a temporary location and
//! decodes it with `ghcnd_processor::decode`.

use ghcnd_processor::constants::{DLY_LINE_WIDTH, MISSING_VALUE};
use ghcnd_processor::{decode, DlyError};
use polars::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Central Park precipitation, March 2021: day 1 measured, days 2-31 missing
fn central_park_line() -> String {
    let mut line = String::from("USW00094728");
    line.push_str("2021");
    line.push_str("03");
    line.push_str("PRCP");
    line.push_str("  123");
    line.push_str("  X");
    for _ in 1..31 {
        line.push_str("-9999   ");
    }
    line
}

fn write_temp_dly(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

fn list_f32(df: &DataFrame, column: &str, row: usize) -> Vec<Option<f32>> {
    let series = df
        .column(column)
        .unwrap()
        .as_materialized_series()
        .list()
        .unwrap()
        .get_as_series(row)
        .unwrap();
    series.f32().unwrap().into_iter().collect()
}

fn list_str(df: &DataFrame, column: &str, row: usize) -> Vec<String> {
    let series = df
        .column(column)
        .unwrap()
        .as_materialized_series()
        .list()
        .unwrap()
        .get_as_series(row)
        .unwrap();
    series
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

fn str_at(df: &DataFrame, column: &str, row: usize) -> String {
    df.column(column)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .get(row)
        .unwrap()
        .to_string()
}

fn days_in_month_at(df: &DataFrame, row: usize) -> u32 {
    df.column("days_in_month")
        .unwrap()
        .as_materialized_series()
        .u32()
        .unwrap()
        .get(row)
        .unwrap()
}

#[test]
fn test_central_park_end_to_end() {
    let line = central_park_line();
    assert_eq!(line.len(), DLY_LINE_WIDTH);

    let file = write_temp_dly(&[line]);
    let df = decode(file.path()).unwrap();

    assert_eq!(df.height(), 1);
    assert_eq!(str_at(&df, "station", 0), "USW00094728");
    assert_eq!(str_at(&df, "element", 0), "PRCP");
    assert_eq!(str_at(&df, "year_month", 0), "202103");
    assert_eq!(days_in_month_at(&df, 0), 31);

    let values = list_f32(&df, "daily_values", 0);
    assert_eq!(values.len(), 31);
    assert_eq!(values[0], Some(123.0));
    assert!(values[1..].iter().all(|v| *v == Some(MISSING_VALUE)));

    let flags = list_str(&df, "qc_flags", 0);
    assert_eq!(flags.len(), 31);
    assert!(flags.iter().all(String::is_empty));
}

#[test]
fn test_month_lengths_across_rows() {
    let make = |year: &str, month: &str| {
        let mut line = central_park_line();
        line.replace_range(11..15, year);
        line.replace_range(15..17, month);
        line
    };
    let file = write_temp_dly(&[
        make("2000", "02"),
        make("1900", "02"),
        make("2024", "02"),
        make("2023", "04"),
    ]);

    let df = decode(file.path()).unwrap();

    let days: Vec<u32> = (0..df.height()).map(|row| days_in_month_at(&df, row)).collect();
    assert_eq!(days, vec![29, 28, 29, 30]);
    for row in 0..df.height() {
        assert_eq!(list_f32(&df, "daily_values", row).len(), 31);
        assert_eq!(list_str(&df, "qc_flags", row).len(), 31);
    }
}

#[test]
fn test_garbled_value_and_ragged_line() {
    let mut garbled = central_park_line();
    garbled.replace_range(29..34, " 1?2 ");
    let ragged = central_park_line()[..37].to_string();

    let file = write_temp_dly(&[garbled, ragged]);
    let df = decode(file.path()).unwrap();
    assert_eq!(df.height(), 2);

    let garbled_values = list_f32(&df, "daily_values", 0);
    assert_eq!(garbled_values[0], Some(123.0));
    assert_eq!(garbled_values[1], None);
    assert_eq!(garbled_values[2], Some(MISSING_VALUE));

    let ragged_values = list_f32(&df, "daily_values", 1);
    assert_eq!(ragged_values.len(), 31);
    assert_eq!(ragged_values[1], Some(MISSING_VALUE));
    assert!(ragged_values[2..].iter().all(Option::is_none));
}

#[test]
fn test_invalid_month_aborts_decode() {
    let mut bad = central_park_line();
    bad.replace_range(15..17, "13");
    let file = write_temp_dly(&[central_park_line(), bad]);

    let result = decode(file.path());
    assert!(matches!(
        result,
        Err(DlyError::MalformedCalendarField { row: 1, .. })
    ));
}

#[test]
fn test_unreadable_source() {
    let result = decode(std::path::Path::new("/definitely/not/here/USW00094728.dly"));
    assert!(matches!(result, Err(DlyError::SourceUnreadable { .. })));
}
