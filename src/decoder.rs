//! GHCN-Daily monthly record decoding.
//!
//! Slices `.dly` lines with the fixed 128-field layout, folds the 31
//! per-day fields into ordered value and flag sequences, types the
//! values as `f32`, and derives the month's start date and true length.
//!
//! Day values that are not numeric become null for that slot only. A
//! year/month pair that cannot form a date is structural: it fails the
//! whole decode unless [`CalendarPolicy::SkipRow`] is configured.

use crate::config::{CalendarPolicy, DecoderConfig};
use crate::constants::{
    columns, DAY_VALUE_WIDTH, DAYS_IN_MONTH, DAYS_PER_RECORD, ELEMENT_FIELD, LEAP_FEBRUARY_DAYS,
    MEASUREMENT_FLAG_WIDTH, MEASUREMENT_SUFFIX, MONTH_FIELD, QUALITY_FLAG_WIDTH, QUALITY_SUFFIX,
    SOURCE_FLAG_WIDTH, SOURCE_SUFFIX, STATION_FIELD, YEAR_FIELD,
};
use crate::error::{ConversionError, DlyError, Result};
use crate::models::{ColumnSpec, DecodedBatch, MonthlyStationRecord};
use crate::slicer;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::io::BufRead;
use std::path::Path;

/// Build the GHCN-Daily column layout: four header fields, then value,
/// measurement flag, quality flag and source flag for each of 31 days.
pub fn dly_column_spec() -> ColumnSpec {
    let header = ColumnSpec::new()
        .with_width(STATION_FIELD.0, STATION_FIELD.1)
        .with_width(YEAR_FIELD.0, YEAR_FIELD.1)
        .with_width(MONTH_FIELD.0, MONTH_FIELD.1)
        .with_width(ELEMENT_FIELD.0, ELEMENT_FIELD.1);

    (0..DAYS_PER_RECORD).fold(header, |spec, day| {
        spec.with_width(day.to_string(), DAY_VALUE_WIDTH)
            .with_width(measurement_column(day), MEASUREMENT_FLAG_WIDTH)
            .with_width(quality_column(day), QUALITY_FLAG_WIDTH)
            .with_width(source_column(day), SOURCE_FLAG_WIDTH)
    })
}

fn measurement_column(day: usize) -> String {
    format!("{}{}", day, MEASUREMENT_SUFFIX)
}

fn quality_column(day: usize) -> String {
    format!("{}{}", day, QUALITY_SUFFIX)
}

fn source_column(day: usize) -> String {
    format!("{}{}", day, SOURCE_SUFFIX)
}

/// Gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a 1-based `month`. `None` for months outside 1..=12.
pub fn days_in_month(month: u32, is_leap_year: bool) -> Option<u32> {
    if month == 2 && is_leap_year {
        return Some(LEAP_FEBRUARY_DAYS);
    }
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    DAYS_IN_MONTH.get(index).copied()
}

/// Day 1 of the given year/month, from their sliced text
pub fn month_start(year: &str, month: &str) -> Option<NaiveDate> {
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Parse one sliced day value.
pub fn parse_day_value(raw: &str) -> std::result::Result<f32, ConversionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::Empty);
    }
    trimmed
        .parse::<f32>()
        .map_err(|_| ConversionError::NotNumeric(trimmed.to_string()))
}

/// Decode a `.dly` file into the monthly record table with default settings.
pub fn decode(path: &Path) -> Result<DataFrame> {
    let batch = decode_records(path, &DecoderConfig::default())?;
    records_to_frame(&batch.records, false)
}

/// Decode a `.dly` file into typed records.
pub fn decode_records(path: &Path, config: &DecoderConfig) -> Result<DecodedBatch> {
    let sliced = slicer::slice_file(path, &dly_column_spec(), config.skip_rows)?;
    decode_sliced(&sliced, config)
}

/// Decode `.dly` lines from any buffered reader.
pub fn decode_reader<R: BufRead>(reader: R, config: &DecoderConfig) -> Result<DecodedBatch> {
    let sliced = slicer::slice_reader(reader, &dly_column_spec(), config.skip_rows)?;
    decode_sliced(&sliced, config)
}

/// Per-day string columns of a sliced table, borrowed in day order
struct DayColumns<'a> {
    values: Vec<&'a StringChunked>,
    quality: Vec<&'a StringChunked>,
    measurement: Vec<&'a StringChunked>,
    source: Vec<&'a StringChunked>,
}

impl<'a> DayColumns<'a> {
    fn from_frame(df: &'a DataFrame) -> Result<Self> {
        let gather = move |name: fn(usize) -> String| -> Result<Vec<&'a StringChunked>> {
            (0..DAYS_PER_RECORD)
                .map(|day| string_column(df, &name(day)))
                .collect()
        };

        Ok(Self {
            values: gather(|day| day.to_string())?,
            quality: gather(quality_column)?,
            measurement: gather(measurement_column)?,
            source: gather(source_column)?,
        })
    }
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    Ok(df.column(name)?.as_materialized_series().str()?)
}

fn cell<'a>(column: &'a StringChunked, row: usize) -> &'a str {
    column.get(row).unwrap_or("")
}

fn gather_row(columns: &[&StringChunked], row: usize) -> Vec<String> {
    columns.iter().map(|c| cell(c, row).to_string()).collect()
}

/// Reduce a table sliced with [`dly_column_spec`] into monthly records.
///
/// Output rows keep input order. Measurement and source flags are read
/// but only kept when `retain_auxiliary_flags` is set.
pub fn decode_sliced(sliced: &DataFrame, config: &DecoderConfig) -> Result<DecodedBatch> {
    let station = string_column(sliced, STATION_FIELD.0)?;
    let year = string_column(sliced, YEAR_FIELD.0)?;
    let month = string_column(sliced, MONTH_FIELD.0)?;
    let element = string_column(sliced, ELEMENT_FIELD.0)?;
    let days = DayColumns::from_frame(sliced)?;

    let mut batch = DecodedBatch {
        records: Vec::with_capacity(sliced.height()),
        skipped_rows: Vec::new(),
    };

    for row in 0..sliced.height() {
        let year_text = cell(year, row);
        let month_text = cell(month, row);

        let calendar = month_start(year_text, month_text).and_then(|date| {
            days_in_month(date.month(), is_leap_year(date.year())).map(|days| (date, days))
        });

        let Some((date, days_in_month)) = calendar else {
            match config.calendar_policy {
                CalendarPolicy::FailFast => {
                    return Err(DlyError::MalformedCalendarField {
                        row,
                        year: year_text.to_string(),
                        month: month_text.to_string(),
                    });
                }
                CalendarPolicy::SkipRow => {
                    batch.skipped_rows.push(row);
                    continue;
                }
            }
        };

        let daily_values = days
            .values
            .iter()
            .map(|column| parse_day_value(cell(column, row)).ok())
            .collect();

        let (measurement_flags, source_flags) = if config.retain_auxiliary_flags {
            (
                Some(gather_row(&days.measurement, row)),
                Some(gather_row(&days.source, row)),
            )
        } else {
            (None, None)
        };

        batch.records.push(MonthlyStationRecord {
            station: cell(station, row).to_string(),
            element: cell(element, row).to_string(),
            year_month: format!("{}{}", year_text, month_text),
            daily_values,
            qc_flags: gather_row(&days.quality, row),
            measurement_flags,
            source_flags,
            date,
            days_in_month,
        });
    }

    Ok(batch)
}

/// Build the output table from decoded records.
///
/// Columns: `station, element, year_month, daily_values, qc_flags,
/// [measurement_flags, source_flags,] date, days_in_month`. The two
/// auxiliary flag columns are only present when `with_auxiliary_flags`.
pub fn records_to_frame(
    records: &[MonthlyStationRecord],
    with_auxiliary_flags: bool,
) -> Result<DataFrame> {
    let rows = records.len();

    let mut frame_columns = vec![
        Column::new(
            columns::STATION.into(),
            records.iter().map(|r| r.station.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            columns::ELEMENT.into(),
            records.iter().map(|r| r.element.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            columns::YEAR_MONTH.into(),
            records.iter().map(|r| r.year_month.as_str()).collect::<Vec<_>>(),
        ),
    ];

    let mut values_builder = ListPrimitiveChunkedBuilder::<Float32Type>::new(
        columns::DAILY_VALUES.into(),
        rows,
        rows * DAYS_PER_RECORD,
        DataType::Float32,
    );
    for record in records {
        values_builder.append_series(&Series::new(PlSmallStr::EMPTY, &record.daily_values))?;
    }
    frame_columns.push(Column::from(values_builder.finish().into_series()));

    frame_columns.push(string_list_column(columns::QC_FLAGS, records, |r| {
        Some(&r.qc_flags)
    })?);

    if with_auxiliary_flags {
        frame_columns.push(string_list_column(columns::MEASUREMENT_FLAGS, records, |r| {
            r.measurement_flags.as_ref()
        })?);
        frame_columns.push(string_list_column(columns::SOURCE_FLAGS, records, |r| {
            r.source_flags.as_ref()
        })?);
    }

    let epoch_days: Vec<i32> = records
        .iter()
        .map(|r| r.date.signed_duration_since(chrono::DateTime::UNIX_EPOCH.date_naive()).num_days() as i32)
        .collect();
    frame_columns.push(Column::new(columns::DATE.into(), epoch_days).cast(&DataType::Date)?);

    frame_columns.push(Column::new(
        columns::DAYS_IN_MONTH.into(),
        records.iter().map(|r| r.days_in_month).collect::<Vec<u32>>(),
    ));

    Ok(DataFrame::new(frame_columns)?)
}

/// `List(String)` column; records without the sequence get a null entry
fn string_list_column<F>(name: &str, records: &[MonthlyStationRecord], get: F) -> Result<Column>
where
    F: Fn(&MonthlyStationRecord) -> Option<&Vec<String>>,
{
    let mut builder =
        ListStringChunkedBuilder::new(name.into(), records.len(), records.len() * DAYS_PER_RECORD);
    for record in records {
        match get(record) {
            Some(flags) => builder.append_series(&Series::new(PlSmallStr::EMPTY, flags))?,
            None => builder.append_null(),
        }
    }
    Ok(Column::from(builder.finish().into_series()))
}
