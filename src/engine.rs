//! Control loop coordinator
//!
//! One engine owns the whole per-cycle path: acquire a thermal frame,
//! derive the stress index, append to the event log, run the daily
//! aggregation, rebuild the history window, fit the trend, classify. The
//! loop is single-threaded and cooperative: [`Engine::poll`] runs one full
//! cycle when the sampling period has elapsed and does nothing otherwise.
//!
//! ## Error posture
//!
//! Initialization errors are fatal and surface from [`Engine::new`] (and
//! from [`AppendLog::open`] before the engine exists). Everything after
//! that is handled locally: a failed acquisition, a degenerate reading, or
//! a store hiccup logs a warning, leaves the previously displayed values in
//! place, and lets the loop continue. No per-cycle error ever aborts the
//! device.
//!
//! [`AppendLog::open`]: crate::store::AppendLog::open

use chrono::NaiveDateTime;

use crate::classify::{Severity, TrendBand};
use crate::config::EngineConfig;
use crate::daily::DailyAggregator;
use crate::errors::EngineError;
use crate::history::{HistoryWindow, HISTORY_SLOTS};
use crate::record::{DailyRecord, SampleRecord};
use crate::sample::Sampler;
use crate::store::{AppendLog, LogMedium};
use crate::time::Clock;
use crate::trend::TrendEstimate;

/// Everything the presentation layer needs from one completed cycle
///
/// The engine makes no assumption about how these are displayed; the
/// indicator hardware only consumes [`CycleOutput::severity`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleOutput {
    /// When the cycle ran
    pub timestamp: NaiveDateTime,
    /// Latest stress index
    pub index: f32,
    /// Running mean over today's in-window samples
    pub today_mean: f32,
    /// 14-slot daily history, oldest first, left-padded
    pub history: [f32; HISTORY_SLOTS],
    /// How many trailing history slots are real days
    pub history_days: usize,
    /// Trend slope, fractional index change per day
    pub slope: f32,
    /// Severity band of the latest index
    pub severity: Severity,
    /// Direction band of the trend slope
    pub trend: TrendBand,
}

/// The sample-to-classification engine
///
/// Generic over the sampler, the clock, and the two log mediums so the
/// whole device can be driven through synthetic days in tests.
pub struct Engine<S, C, ME, MD>
where
    S: Sampler,
    C: Clock,
    ME: LogMedium,
    MD: LogMedium,
{
    sampler: S,
    clock: C,
    events: AppendLog<SampleRecord, ME>,
    daily: AppendLog<DailyRecord, MD>,
    aggregator: DailyAggregator,
    period_secs: u32,
    last_cycle_at: Option<NaiveDateTime>,
    /// Retained for the degenerate-reading path: max == min substitutes the
    /// previous index instead of propagating a non-finite value.
    last_index: Option<f32>,
    last_output: Option<CycleOutput>,
}

impl<S, C, ME, MD> Engine<S, C, ME, MD>
where
    S: Sampler,
    C: Clock,
    ME: LogMedium,
    MD: LogMedium,
{
    /// Build the engine, validating config and probing the sensor
    ///
    /// Both logs must already be open; storage unavailability is fatal at
    /// their `open` call. A failed sensor probe is fatal here: with no
    /// sensor there is no degraded mode worth running.
    pub fn new(
        mut sampler: S,
        clock: C,
        events: AppendLog<SampleRecord, ME>,
        daily: AppendLog<DailyRecord, MD>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        sampler.probe()?;

        Ok(Self {
            sampler,
            clock,
            events,
            daily,
            aggregator: DailyAggregator::new(&config),
            period_secs: config.sample_period_secs,
            last_cycle_at: None,
            last_index: None,
            last_output: None,
        })
    }

    /// Run one cycle if the sampling period has elapsed
    ///
    /// Returns the cycle's output when one ran to completion, `None` when
    /// it is not yet time or the cycle was skipped (no frame, degenerate
    /// first reading, store hiccup). The previously displayed values remain
    /// valid in all `None` cases.
    pub fn poll(&mut self) -> Option<CycleOutput> {
        let now = self.clock.now();
        if let Some(prev) = self.last_cycle_at {
            if (now - prev).num_seconds() < i64::from(self.period_secs) {
                return None;
            }
        }
        self.run_cycle(now)
    }

    /// Run one full cycle at the given instant
    ///
    /// Exposed for hosts that schedule externally (and for tests that walk
    /// the engine through synthetic days).
    pub fn run_cycle(&mut self, now: NaiveDateTime) -> Option<CycleOutput> {
        // The period is consumed even when the cycle skips: a failed
        // acquisition must not cause a tight retry loop.
        self.last_cycle_at = Some(now);

        let reading = match self.sampler.acquire() {
            Ok(reading) => reading,
            Err(nb::Error::WouldBlock) => {
                log::debug!("no frame this cycle, display unchanged");
                return None;
            }
            Err(nb::Error::Other(e)) => {
                log::warn!("acquisition failed: {}", e);
                return None;
            }
        };

        let index = match reading.stress_index() {
            Some(index) => index,
            None => match self.last_index {
                Some(prev) => {
                    log::warn!("degenerate reading (no contrast), retaining index {:.3}", prev);
                    prev
                }
                None => {
                    log::warn!("degenerate reading with no prior index, skipping cycle");
                    return None;
                }
            },
        };

        let record = SampleRecord {
            timestamp: now,
            index,
            t_max: reading.t_max,
            t_min: reading.t_min,
            t_mean: reading.t_mean,
        };
        if let Err(e) = self.events.append(&record) {
            log::warn!("sample append failed: {}", e);
            return None;
        }
        self.last_index = Some(index);

        let status = match self.aggregator.run(&self.events, &mut self.daily, now) {
            Ok(status) => status,
            Err(e) => {
                log::warn!("daily aggregation failed: {}", e);
                return None;
            }
        };

        let window = match HistoryWindow::extract(&self.daily) {
            Ok(window) => window,
            Err(e) => {
                log::warn!("history extraction failed: {}", e);
                return None;
            }
        };

        let trend = TrendEstimate::from_window(&window);
        let output = CycleOutput {
            timestamp: now,
            index,
            today_mean: status.running_mean,
            history: *window.values(),
            history_days: window.real_len(),
            slope: trend.slope,
            severity: Severity::from_index(index),
            trend: TrendBand::from_slope(trend.slope),
        };
        self.last_output = Some(output);
        Some(output)
    }

    /// Most recent completed cycle's output
    pub fn last_output(&self) -> Option<&CycleOutput> {
        self.last_output.as_ref()
    }

    /// Severity band alone, for the physical indicator
    pub fn severity(&self) -> Option<Severity> {
        self.last_output.map(|o| o.severity)
    }

    /// Event log, for report generation
    pub fn event_log(&self) -> &AppendLog<SampleRecord, ME> {
        &self.events
    }

    /// Daily log, for report generation
    pub fn daily_log(&self) -> &AppendLog<DailyRecord, MD> {
        &self.daily
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SampleError;
    use crate::sample::ThermalReading;
    use crate::store::MemoryMedium;
    use crate::time::FixedClock;
    use chrono::NaiveDate;

    struct FixedSampler(nb::Result<ThermalReading, SampleError>);

    impl Sampler for FixedSampler {
        fn acquire(&mut self) -> nb::Result<ThermalReading, SampleError> {
            self.0
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn engine(
        sampler: FixedSampler,
    ) -> Engine<FixedSampler, FixedClock, MemoryMedium<8192>, MemoryMedium<1024>> {
        Engine::new(
            sampler,
            FixedClock::new(at(6, 0)),
            AppendLog::open(MemoryMedium::new()).unwrap(),
            AppendLog::open(MemoryMedium::new()).unwrap(),
            EngineConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn completed_cycle_logs_and_classifies() {
        let reading = ThermalReading {
            t_max: 30.0,
            t_min: 20.0,
            t_mean: 27.5,
        };
        let mut engine = engine(FixedSampler(Ok(reading)));

        let output = engine.run_cycle(at(6, 0)).unwrap();
        assert!((output.index - 0.75).abs() < 1e-6);
        assert_eq!(output.severity, Severity::High);
        assert_eq!(output.history_days, 0);
        assert_eq!(engine.event_log().count().unwrap(), 1);
        assert_eq!(engine.severity(), Some(Severity::High));
    }

    #[test]
    fn missing_frame_skips_cycle() {
        let mut engine = engine(FixedSampler(Err(nb::Error::WouldBlock)));

        assert!(engine.run_cycle(at(6, 0)).is_none());
        assert_eq!(engine.event_log().count().unwrap(), 0);
        assert!(engine.severity().is_none());
    }

    #[test]
    fn degenerate_first_reading_skips_cycle() {
        let reading = ThermalReading {
            t_max: 25.0,
            t_min: 25.0,
            t_mean: 25.0,
        };
        let mut engine = engine(FixedSampler(Ok(reading)));

        assert!(engine.run_cycle(at(6, 0)).is_none());
        assert_eq!(engine.event_log().count().unwrap(), 0);
    }

    #[test]
    fn poll_respects_the_period() {
        let reading = ThermalReading {
            t_max: 30.0,
            t_min: 20.0,
            t_mean: 24.0,
        };
        let mut engine = engine(FixedSampler(Ok(reading)));

        // First poll runs a cycle; with a frozen clock the next one is
        // inside the period and does nothing.
        assert!(engine.poll().is_some());
        assert!(engine.poll().is_none());
        assert_eq!(engine.event_log().count().unwrap(), 1);
    }
}
