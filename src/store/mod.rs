//! Append-only fixed-width record stores
//!
//! Both durable logs (per-sample event log, per-day aggregate log) share one
//! access layer: a header row followed by fixed-width records, append-only,
//! with strictly sequential reads.
//!
//! ## Module Organization
//!
//! - Core traits and the generic [`AppendLog`] (this file)
//! - `memory` - heapless in-memory medium for tests and no_std targets
//! - `file` - `std::fs` medium (requires the `store-file` feature)
//!
//! ## Access contract
//!
//! The record count is `(size_bytes - header_len) / record_len`; delimiters
//! are never scanned for counting. `read(k)` is a sequential O(k) scan from
//! the start of the store. That cost is intentional: the windows read on
//! this device are bounded (14 daily aggregates, at most one day of
//! samples), and upgrading to random access would change the memory and
//! latency assumptions on the target hardware.
//!
//! Appends open, write, and release the medium before any read begins; with
//! the single-threaded control loop this guarantees a record is never read
//! while it is being appended.

use core::marker::PhantomData;

use crate::errors::{StoreError, StoreResult};
use crate::record::{FixedRecord, RecordBuf, MAX_ENCODED_LEN};

pub mod memory;

#[cfg(feature = "store-file")]
pub mod file;

pub use memory::MemoryMedium;

#[cfg(feature = "store-file")]
pub use file::FileMedium;

/// Sequential reader over a log medium
///
/// There is deliberately no seek: `skip` consumes bytes by reading them, so
/// every implementation preserves the sequential-access contract.
pub trait MediumCursor {
    /// Read exactly `buf.len()` bytes
    fn read_exact(&mut self, buf: &mut [u8]) -> StoreResult<()>;

    /// Consume and discard `bytes` bytes
    fn skip(&mut self, mut bytes: u64) -> StoreResult<()> {
        let mut chunk = [0u8; 64];
        while bytes > 0 {
            let take = bytes.min(chunk.len() as u64) as usize;
            self.read_exact(&mut chunk[..take])?;
            bytes -= take as u64;
        }
        Ok(())
    }
}

/// Storage medium backing an append-only log
///
/// The medium only needs four operations; everything record-shaped lives in
/// [`AppendLog`]. `truncate` exists solely so a torn append (power loss
/// mid-write) can be repaired on open.
pub trait LogMedium {
    /// Sequential reader type
    type Cursor<'a>: MediumCursor
    where
        Self: 'a;

    /// Total stored bytes; a medium that does not exist yet reports 0
    fn size_bytes(&self) -> StoreResult<u64>;

    /// Append bytes at the end, creating the medium if needed
    ///
    /// The write must be released (handle closed) before this returns.
    fn append(&mut self, bytes: &[u8]) -> StoreResult<()>;

    /// Discard everything past `len` bytes
    fn truncate(&mut self, len: u64) -> StoreResult<()>;

    /// Open a sequential reader at the start of the medium
    fn read_from_start(&self) -> StoreResult<Self::Cursor<'_>>;
}

/// Append-only log of fixed-width records over some medium
///
/// Generic over the record type (which supplies the codec and header) and
/// the medium (file on the device, memory in tests).
pub struct AppendLog<R: FixedRecord, M: LogMedium> {
    medium: M,
    _record: PhantomData<R>,
}

impl<R: FixedRecord, M: LogMedium> AppendLog<R, M> {
    /// Open the log, creating it with its header row on first run
    ///
    /// An unreadable or unwritable medium surfaces here; at device startup
    /// that is fatal. A trailing partial record (torn append after power
    /// loss) is trimmed away so subsequent rows stay aligned.
    pub fn open(mut medium: M) -> StoreResult<Self> {
        let size = medium.size_bytes()?;
        let header_len = R::HEADER.len() as u64;

        if size == 0 {
            medium.append(R::HEADER.as_bytes())?;
            return Ok(Self {
                medium,
                _record: PhantomData,
            });
        }

        if size < header_len {
            return Err(StoreError::Corrupt {
                reason: "store smaller than header",
            });
        }

        let torn = (size - header_len) % R::ENCODED_LEN as u64;
        if torn != 0 {
            log::warn!(
                "trimming {} torn trailing bytes from log ({} total)",
                torn,
                size
            );
            medium.truncate(size - torn)?;
        }

        Ok(Self {
            medium,
            _record: PhantomData,
        })
    }

    /// Number of records currently stored, header excluded
    pub fn count(&self) -> StoreResult<u64> {
        let size = self.medium.size_bytes()?;
        let header_len = R::HEADER.len() as u64;
        Ok(size.saturating_sub(header_len) / R::ENCODED_LEN as u64)
    }

    /// Append one record as a fixed-width row
    pub fn append(&mut self, record: &R) -> StoreResult<()> {
        let mut buf = RecordBuf::new();
        record.encode_into(&mut buf)?;
        self.medium.append(buf.as_bytes())
    }

    /// Read record `k` (0-based, oldest first) by sequential scan
    ///
    /// `k` at or beyond the current count is [`StoreError::NotFound`], never
    /// corruption: callers probe past the end when estimating day
    /// boundaries.
    pub fn read(&self, k: u64) -> StoreResult<R> {
        if k >= self.count()? {
            return Err(StoreError::NotFound);
        }

        let mut cursor = self.medium.read_from_start()?;
        cursor.skip(R::HEADER.len() as u64 + k * R::ENCODED_LEN as u64)?;

        let mut row = [0u8; MAX_ENCODED_LEN];
        cursor.read_exact(&mut row[..R::ENCODED_LEN])?;

        let line = core::str::from_utf8(&row[..R::ENCODED_LEN]).map_err(|_| {
            StoreError::Corrupt {
                reason: "row is not valid utf-8",
            }
        })?;
        R::decode(line)
    }

    /// Most recent record, if any
    pub fn last(&self) -> StoreResult<Option<R>> {
        let count = self.count()?;
        if count == 0 {
            return Ok(None);
        }
        self.read(count - 1).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SampleRecord;
    use chrono::{NaiveDate, Timelike};

    type TestLog = AppendLog<SampleRecord, MemoryMedium<8192>>;

    fn sample(minute: u32, index: f32) -> SampleRecord {
        SampleRecord {
            timestamp: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(6, minute, 0)
                .unwrap(),
            index,
            t_max: 30.0,
            t_min: 20.0,
            t_mean: 20.0 + 10.0 * index,
        }
    }

    #[test]
    fn first_open_writes_header() {
        let log = TestLog::open(MemoryMedium::new()).unwrap();
        assert_eq!(log.count().unwrap(), 0);
        assert_eq!(
            log.medium.size_bytes().unwrap(),
            SampleRecord::HEADER.len() as u64
        );
    }

    #[test]
    fn count_matches_appends() {
        let mut log = TestLog::open(MemoryMedium::new()).unwrap();
        for i in 0..7 {
            log.append(&sample(i, 0.1 * i as f32)).unwrap();
        }
        assert_eq!(log.count().unwrap(), 7);
    }

    #[test]
    fn read_returns_requested_record() {
        let mut log = TestLog::open(MemoryMedium::new()).unwrap();
        for i in 0..5 {
            log.append(&sample(i, 0.1 * i as f32)).unwrap();
        }

        let record = log.read(3).unwrap();
        assert!((record.index - 0.3).abs() < 1e-3);
        assert_eq!(record.timestamp.time().minute(), 3);
    }

    #[test]
    fn read_past_end_is_not_found() {
        let mut log = TestLog::open(MemoryMedium::new()).unwrap();
        log.append(&sample(0, 0.5)).unwrap();

        assert_eq!(log.read(1), Err(StoreError::NotFound));
        assert_eq!(log.read(100), Err(StoreError::NotFound));
    }

    #[test]
    fn reopen_preserves_records() {
        let mut log = TestLog::open(MemoryMedium::new()).unwrap();
        log.append(&sample(0, 0.2)).unwrap();
        log.append(&sample(15, 0.4)).unwrap();

        let medium = log.medium;
        let reopened = TestLog::open(medium).unwrap();
        assert_eq!(reopened.count().unwrap(), 2);
        assert!((reopened.last().unwrap().unwrap().index - 0.4).abs() < 1e-3);
    }

    #[test]
    fn torn_tail_trimmed_on_open() {
        let mut log = TestLog::open(MemoryMedium::new()).unwrap();
        log.append(&sample(0, 0.2)).unwrap();

        // Simulate power loss mid-append: half a row at the tail
        let mut medium = log.medium;
        medium.append(b"2025.06.01-06:15").unwrap();

        let reopened = TestLog::open(medium).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        assert!((reopened.read(0).unwrap().index - 0.2).abs() < 1e-3);
    }
}
