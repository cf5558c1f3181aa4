//! Fixed-width record codec for the append-only logs
//!
//! Both logs are plain text, one fixed-width row per record, so that a
//! reader can compute the record count by dividing the byte length by the
//! row length. Delimiters exist only for field extraction, never for
//! counting.
//!
//! Writer and reader share one codec per record type. Field boundaries are
//! derived from the width constants below; there are no duplicated offset
//! literals to drift apart.
//!
//! ## Wire formats
//!
//! Event log, 51 bytes per row:
//! ```text
//! timestamp,index,tmax,tmin,tmean
//! 2025.06.01-06:15:00, 0.400,  30.00,  20.00,  24.00
//! ```
//!
//! Daily log, 18 bytes per row:
//! ```text
//! date,mean_index
//! 2025.06.01, 0.412
//! ```

use core::fmt::Write as _;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::errors::{StoreError, StoreResult};

/// Upper bound on any encoded row, sized for the stack scratch buffers
pub const MAX_ENCODED_LEN: usize = 64;

/// Stack buffer a record encodes into
pub type RecordBuf = heapless::String<MAX_ENCODED_LEN>;

/// Width of a `YYYY.MM.DD-HH:MM:SS` timestamp
const TIMESTAMP_WIDTH: usize = 19;
/// Width of a `YYYY.MM.DD` date
const DATE_WIDTH: usize = 10;
/// Width of an index field, formatted `{:6.3}`
const INDEX_WIDTH: usize = 6;
/// Width of a temperature field, formatted `{:7.2}`
const TEMP_WIDTH: usize = 7;

/// A record with a fixed-width wire encoding
///
/// `ENCODED_LEN` includes the trailing newline. `HEADER` is written once
/// when a store is created and its length subtracted before any row-count
/// arithmetic.
pub trait FixedRecord: Sized {
    /// Exact encoded row length in bytes, newline included
    const ENCODED_LEN: usize;

    /// Header row written on store creation, newline included
    const HEADER: &'static str;

    /// Encode into `out`, which must end up exactly `ENCODED_LEN` bytes
    fn encode_into(&self, out: &mut RecordBuf) -> StoreResult<()>;

    /// Decode one row (newline included)
    fn decode(line: &str) -> StoreResult<Self>;
}

/// Verify an encoded row came out at its fixed width
///
/// A value too large for its field would otherwise produce a ragged row and
/// silently corrupt every subsequent offset.
fn check_width(buf: &RecordBuf, expected: usize) -> StoreResult<()> {
    if buf.len() != expected {
        return Err(StoreError::Overflow);
    }
    Ok(())
}

fn parse_f32(field: &str) -> StoreResult<f32> {
    field
        .trim()
        .parse::<f32>()
        .map_err(|_| StoreError::Corrupt {
            reason: "unparseable numeric field",
        })
}

fn expect_separator(line: &str, at: usize, sep: u8) -> StoreResult<()> {
    if line.as_bytes().get(at) != Some(&sep) {
        return Err(StoreError::Corrupt {
            reason: "missing field separator",
        });
    }
    Ok(())
}

fn parse_date(field: &str) -> StoreResult<NaiveDate> {
    expect_separator(field, 4, b'.')?;
    expect_separator(field, 7, b'.')?;

    let bad = StoreError::Corrupt {
        reason: "invalid date",
    };
    let year = field[0..4].parse::<i32>().map_err(|_| bad)?;
    let month = field[5..7].parse::<u32>().map_err(|_| bad)?;
    let day = field[8..10].parse::<u32>().map_err(|_| bad)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or(bad)
}

fn parse_timestamp(field: &str) -> StoreResult<NaiveDateTime> {
    expect_separator(field, 10, b'-')?;
    expect_separator(field, 13, b':')?;
    expect_separator(field, 16, b':')?;

    let bad = StoreError::Corrupt {
        reason: "invalid timestamp",
    };
    let date = parse_date(&field[0..DATE_WIDTH])?;
    let hour = field[11..13].parse::<u32>().map_err(|_| bad)?;
    let minute = field[14..16].parse::<u32>().map_err(|_| bad)?;
    let second = field[17..19].parse::<u32>().map_err(|_| bad)?;

    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or(bad)?;
    Ok(NaiveDateTime::new(date, time))
}

fn write_date(out: &mut RecordBuf, date: NaiveDate) -> StoreResult<()> {
    write!(
        out,
        "{:04}.{:02}.{:02}",
        date.year(),
        date.month(),
        date.day()
    )
    .map_err(|_| StoreError::Overflow)
}

fn write_timestamp(out: &mut RecordBuf, ts: NaiveDateTime) -> StoreResult<()> {
    write_date(out, ts.date())?;
    write!(
        out,
        "-{:02}:{:02}:{:02}",
        ts.hour(),
        ts.minute(),
        ts.second()
    )
    .map_err(|_| StoreError::Overflow)
}

/// One logged sample: timestamp, stress index, and the raw temperature trio
///
/// Immutable once written; its identity is its append position in the event
/// log.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleRecord {
    /// Local acquisition time, second precision
    pub timestamp: NaiveDateTime,
    /// Stress index for this sample
    pub index: f32,
    /// Maximum surface temperature
    pub t_max: f32,
    /// Minimum surface temperature
    pub t_min: f32,
    /// Mean surface temperature
    pub t_mean: f32,
}

impl SampleRecord {
    // Field offsets, derived from the widths so writer and reader agree.
    const INDEX_START: usize = TIMESTAMP_WIDTH + 1;
    const TMAX_START: usize = Self::INDEX_START + INDEX_WIDTH + 1;
    const TMIN_START: usize = Self::TMAX_START + TEMP_WIDTH + 1;
    const TMEAN_START: usize = Self::TMIN_START + TEMP_WIDTH + 1;
}

impl FixedRecord for SampleRecord {
    const ENCODED_LEN: usize = Self::TMEAN_START + TEMP_WIDTH + 1;
    const HEADER: &'static str = "timestamp,index,tmax,tmin,tmean\n";

    fn encode_into(&self, out: &mut RecordBuf) -> StoreResult<()> {
        out.clear();
        write_timestamp(out, self.timestamp)?;
        write!(
            out,
            ",{:6.3},{:7.2},{:7.2},{:7.2}\n",
            self.index, self.t_max, self.t_min, self.t_mean
        )
        .map_err(|_| StoreError::Overflow)?;
        check_width(out, Self::ENCODED_LEN)
    }

    fn decode(line: &str) -> StoreResult<Self> {
        if line.len() != Self::ENCODED_LEN {
            return Err(StoreError::Corrupt {
                reason: "row length mismatch",
            });
        }
        expect_separator(line, TIMESTAMP_WIDTH, b',')?;
        expect_separator(line, Self::TMAX_START - 1, b',')?;
        expect_separator(line, Self::TMIN_START - 1, b',')?;
        expect_separator(line, Self::TMEAN_START - 1, b',')?;

        Ok(Self {
            timestamp: parse_timestamp(&line[0..TIMESTAMP_WIDTH])?,
            index: parse_f32(&line[Self::INDEX_START..Self::INDEX_START + INDEX_WIDTH])?,
            t_max: parse_f32(&line[Self::TMAX_START..Self::TMAX_START + TEMP_WIDTH])?,
            t_min: parse_f32(&line[Self::TMIN_START..Self::TMIN_START + TEMP_WIDTH])?,
            t_mean: parse_f32(&line[Self::TMEAN_START..Self::TMEAN_START + TEMP_WIDTH])?,
        })
    }
}

/// One completed day's aggregate: date and the mean in-window index
///
/// Written at most once per calendar day, and only when the aggregation
/// window was fully covered.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyRecord {
    /// Calendar day this aggregate covers
    pub date: NaiveDate,
    /// Mean stress index over the day's aggregation window
    pub mean_index: f32,
}

impl DailyRecord {
    const MEAN_START: usize = DATE_WIDTH + 1;
}

impl FixedRecord for DailyRecord {
    const ENCODED_LEN: usize = Self::MEAN_START + INDEX_WIDTH + 1;
    const HEADER: &'static str = "date,mean_index\n";

    fn encode_into(&self, out: &mut RecordBuf) -> StoreResult<()> {
        out.clear();
        write_date(out, self.date)?;
        write!(out, ",{:6.3}\n", self.mean_index).map_err(|_| StoreError::Overflow)?;
        check_width(out, Self::ENCODED_LEN)
    }

    fn decode(line: &str) -> StoreResult<Self> {
        if line.len() != Self::ENCODED_LEN {
            return Err(StoreError::Corrupt {
                reason: "row length mismatch",
            });
        }
        expect_separator(line, DATE_WIDTH, b',')?;

        Ok(Self {
            date: parse_date(&line[0..DATE_WIDTH])?,
            mean_index: parse_f32(&line[Self::MEAN_START..Self::MEAN_START + INDEX_WIDTH])?,
        })
    }
}
