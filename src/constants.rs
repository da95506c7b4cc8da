//! Application constants for the GHCN-Daily processor
//!
//! Field widths of the `.dly` layout, output column names and the
//! month-length table used by the decoder.

use std::num::NonZeroUsize;

// =============================================================================
// GHCN-Daily Fixed-Width Layout
// =============================================================================

const fn width(bytes: usize) -> NonZeroUsize {
    match NonZeroUsize::new(bytes) {
        Some(width) => width,
        None => panic!("layout field widths must be positive"),
    }
}

/// Header field names and widths, in file order
pub const STATION_FIELD: (&str, NonZeroUsize) = ("STATION", width(11));
pub const YEAR_FIELD: (&str, NonZeroUsize) = ("Year", width(4));
pub const MONTH_FIELD: (&str, NonZeroUsize) = ("Month", width(2));
pub const ELEMENT_FIELD: (&str, NonZeroUsize) = ("Element", width(4));

/// Number of day slots on every record, whatever the month length
pub const DAYS_PER_RECORD: usize = 31;

/// Widths of the four per-day fields
pub const DAY_VALUE_WIDTH: NonZeroUsize = width(5);
pub const MEASUREMENT_FLAG_WIDTH: NonZeroUsize = width(1);
pub const QUALITY_FLAG_WIDTH: NonZeroUsize = width(1);
pub const SOURCE_FLAG_WIDTH: NonZeroUsize = width(1);

/// Suffixes appended to the day index for the per-day flag fields.
/// The value field itself is named by the bare day index ("0".."30").
pub const MEASUREMENT_SUFFIX: &str = "_measure";
pub const QUALITY_SUFFIX: &str = "_quality_control";
pub const SOURCE_SUFFIX: &str = "_source";

/// Width of a well-formed `.dly` line: 11 + 4 + 2 + 4 + 31 * (5 + 1 + 1 + 1)
pub const DLY_LINE_WIDTH: usize = 269;

/// Extension of GHCN-Daily station files
pub const DLY_EXTENSION: &str = "dly";

/// Output file stem used when the input path has no usable stem (e.g. `.`)
pub const DEFAULT_OUTPUT_STEM: &str = "ghcnd";

/// Missing-value placeholder used by the archive. Kept numeric in the
/// output; masking belongs to consumers.
pub const MISSING_VALUE: f32 = -9999.0;

// =============================================================================
// Calendar
// =============================================================================

/// Days per month for a common year, January first
pub const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// February length in a leap year
pub const LEAP_FEBRUARY_DAYS: u32 = 29;

// =============================================================================
// Output Columns
// =============================================================================

pub mod columns {
    pub const STATION: &str = "station";
    pub const ELEMENT: &str = "element";
    pub const YEAR_MONTH: &str = "year_month";
    pub const DAILY_VALUES: &str = "daily_values";
    pub const QC_FLAGS: &str = "qc_flags";
    pub const MEASUREMENT_FLAGS: &str = "measurement_flags";
    pub const SOURCE_FLAGS: &str = "source_flags";
    pub const DATE: &str = "date";
    pub const DAYS_IN_MONTH: &str = "days_in_month";
}

// =============================================================================
// Processing Defaults
// =============================================================================

/// Default number of files decoded concurrently by the pipeline
pub const DEFAULT_MAX_CONCURRENT_FILES: usize = 8;

/// Default parquet row group size
pub const DEFAULT_ROW_GROUP_SIZE: usize = 250_000;
