//! Fixed-size history window over the daily log
//!
//! The presentation layer charts a fortnight of daily aggregates and the
//! trend estimator consumes the newest five of them, so the window is a
//! value type with exactly [`HISTORY_SLOTS`] slots regardless of how much
//! real history exists. Rebuilt from the daily log on every aggregation
//! cycle rather than mutated in place across cycles; extraction is a pure
//! sequential scan and re-running it on an unchanged log yields identical
//! contents.

use crate::errors::StoreResult;
use crate::record::DailyRecord;
use crate::store::{AppendLog, LogMedium};

/// Number of daily aggregates the window holds
pub const HISTORY_SLOTS: usize = 14;

/// Padding value for slots with no real history behind them
///
/// 0.0 rather than NaN: the trend fit always runs over the full window and
/// must stay finite early in device life.
pub const HISTORY_PAD: f32 = 0.0;

/// Oldest-first window of the last 14 daily mean indices
///
/// Left-padded with [`HISTORY_PAD`] when fewer than 14 daily records exist;
/// the newest real value always sits in the last slot.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryWindow {
    values: [f32; HISTORY_SLOTS],
    real: usize,
}

impl HistoryWindow {
    /// An all-padding window (no history yet)
    pub const fn empty() -> Self {
        Self {
            values: [HISTORY_PAD; HISTORY_SLOTS],
            real: 0,
        }
    }

    /// Extract the last `min(14, count)` daily aggregates, oldest first
    ///
    /// Sequential scan from `max(0, count - 14)` to the end of the log.
    pub fn extract<M: LogMedium>(daily: &AppendLog<DailyRecord, M>) -> StoreResult<Self> {
        let count = daily.count()?;
        let take = count.min(HISTORY_SLOTS as u64);
        let start = count - take;

        let mut window = Self::empty();
        for i in 0..take {
            let record = daily.read(start + i)?;
            window.values[HISTORY_SLOTS - take as usize + i as usize] = record.mean_index;
        }
        window.real = take as usize;
        Ok(window)
    }

    /// All 14 slots, oldest first, padding included
    pub fn values(&self) -> &[f32; HISTORY_SLOTS] {
        &self.values
    }

    /// How many trailing slots hold real daily aggregates
    pub fn real_len(&self) -> usize {
        self.real
    }

    /// The newest real daily mean, if any day has completed yet
    pub fn newest(&self) -> Option<f32> {
        if self.real == 0 {
            return None;
        }
        Some(self.values[HISTORY_SLOTS - 1])
    }

    /// The newest `n` slots (padding included), oldest first
    pub fn tail(&self, n: usize) -> &[f32] {
        let n = n.min(HISTORY_SLOTS);
        &self.values[HISTORY_SLOTS - n..]
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::empty()
    }
}
