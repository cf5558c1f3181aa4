//! Daily aggregation of in-window samples
//!
//! After every sample append the aggregator derives today's coverage from
//! the clock, averages the index field over the ordinal range of the event
//! log that falls inside the configured local-time window, and commits one
//! [`DailyRecord`] the moment the window is fully covered.
//!
//! ## Ordinal arithmetic, not timestamp scanning
//!
//! The count of samples taken so far today comes from the local time of day
//! divided by the sampling period, never from scanning the log: power loss
//! leaves gaps, and a gapped log must not be mistaken for a complete one.
//! The day's first record index is latched once per date rollover; in-window
//! records are located by arithmetic offset from that anchor, and timestamps
//! are read only to extract the index field.
//!
//! ## Commit policy
//!
//! A day commits exactly when three counts agree: the clock says the window
//! has fully elapsed, every clock tick of the day has a matching record (no
//! gaps, so the ordinal attribution is exact), and the full expected window
//! count is present. Anything else - mid-window query, mid-day boot, missed
//! cycles - is "not yet complete": the running mean is still produced for
//! display, but nothing is committed. A truncated day never pollutes the
//! long-term record.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::config::EngineConfig;
use crate::errors::StoreResult;
use crate::record::{DailyRecord, SampleRecord};
use crate::store::{AppendLog, LogMedium};

/// Per-cycle aggregation outcome, for display
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayStatus {
    /// Day being aggregated
    pub date: NaiveDate,
    /// Mean index over the in-window samples seen so far
    pub running_mean: f32,
    /// In-window samples included in `running_mean`
    pub in_window: u32,
    /// Samples a fully covered window contains
    pub expected: u32,
    /// Whether this cycle committed the day's record
    pub committed: bool,
}

/// Anchor state for the day currently being aggregated
#[derive(Debug, Clone, Copy)]
struct DayState {
    date: NaiveDate,
    /// Event-log index of the day's first record
    ///
    /// Latched at date rollover as `total - ticks_today`, clamped at zero.
    /// After a mid-day boot this is an estimate; the gap-free commit check
    /// then fails for the rest of the day, which is the intended
    /// "incomplete, do not commit" behavior.
    start_total: u64,
    committed: bool,
}

impl DayState {
    fn latch(date: NaiveDate, total: u64, ticks: u64) -> Self {
        Self {
            date,
            start_total: total.saturating_sub(ticks),
            committed: false,
        }
    }
}

/// Windowed daily aggregator over the event log
///
/// Explicitly held state instead of process-wide accumulators: one anchor
/// per day, reset at date rollover, everything else recomputed each cycle
/// from the logs.
#[derive(Debug)]
pub struct DailyAggregator {
    period_secs: u32,
    window_start_secs: u32,
    window_end_secs: u32,
    day: Option<DayState>,
}

impl DailyAggregator {
    /// Aggregator for the given cadence and window
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            period_secs: config.sample_period_secs,
            window_start_secs: config.window_start_secs,
            window_end_secs: config.window_end_secs,
            day: None,
        }
    }

    /// Samples a fully covered window contains
    pub fn expected_samples(&self) -> u32 {
        (self.window_end_secs - self.window_start_secs) / self.period_secs
    }

    /// Ordinal offset of the first in-window sample from the day's first
    fn window_start_offset(&self) -> u64 {
        (self.window_start_secs / self.period_secs) as u64
    }

    /// Samples taken so far today, derived from the clock alone
    ///
    /// The midnight sample counts as the first, so this is ticks-elapsed
    /// plus one. Independent of log contents by design: the log may have
    /// gaps from earlier power loss.
    pub fn samples_so_far(&self, now: NaiveDateTime) -> u64 {
        (now.time().num_seconds_from_midnight() / self.period_secs) as u64 + 1
    }

    /// Run one aggregation pass after a sample append
    ///
    /// Commits at most one daily record per date; re-running on later
    /// cycles of a committed day only refreshes the running mean.
    pub fn run<ME: LogMedium, MD: LogMedium>(
        &mut self,
        events: &AppendLog<SampleRecord, ME>,
        daily: &mut AppendLog<DailyRecord, MD>,
        now: NaiveDateTime,
    ) -> StoreResult<DayStatus> {
        let today = now.date();
        let total = events.count()?;
        let ticks_today = self.samples_so_far(now);

        let expected = self.expected_samples() as u64;
        let start_offset = self.window_start_offset();

        let state = self
            .day
            .get_or_insert_with(|| DayState::latch(today, total, ticks_today));
        if state.date != today {
            *state = DayState::latch(today, total, ticks_today);
        }

        // How many in-window samples the clock says should exist by now
        let elapsed_in_window = ticks_today
            .saturating_sub(start_offset)
            .min(expected);

        // Mean over the in-window ordinal range actually present
        let first_in_window = state.start_total + start_offset;
        let mut sum = 0.0f64;
        let mut in_window = 0u32;
        for k in first_in_window..first_in_window + elapsed_in_window {
            if k >= total {
                break;
            }
            sum += events.read(k)?.index as f64;
            in_window += 1;
        }
        let running_mean = if in_window > 0 {
            (sum / in_window as f64) as f32
        } else {
            0.0
        };

        // Exact-coverage commit gate: window elapsed, no gaps today (so the
        // ordinal attribution is trustworthy), full expected count present.
        let records_today = total - state.start_total;
        let complete = elapsed_in_window == expected
            && records_today == ticks_today
            && u64::from(in_window) == expected;

        let mut committed = false;
        if complete && !state.committed {
            // Reboot between commit and midnight: the daily log already has
            // today, only the in-memory flag was lost.
            let already = matches!(daily.last()?, Some(rec) if rec.date == today);
            if already {
                state.committed = true;
            } else {
                daily.append(&DailyRecord {
                    date: today,
                    mean_index: running_mean,
                })?;
                state.committed = true;
                committed = true;
                log::debug!(
                    "committed daily record for {}: mean {:.3} over {} samples",
                    today,
                    running_mean,
                    in_window
                );
            }
        }

        Ok(DayStatus {
            date: today,
            running_mean,
            in_window,
            expected: self.expected_samples(),
            committed,
        })
    }
}
