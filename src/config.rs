//! Engine configuration
//!
//! All cadence and window parameters live here as named values rather than
//! scattered literals. Defaults match the deployed device: one sample every
//! 15 minutes, daily aggregation over 06:00-18:00 local time.

use crate::errors::ConfigError;

/// Seconds in one day
pub const SECS_PER_DAY: u32 = 86_400;

/// Default sampling period: 15 minutes
pub const DEFAULT_SAMPLE_PERIOD_SECS: u32 = 900;

/// Default aggregation window start: 06:00 local
pub const DEFAULT_WINDOW_START_SECS: u32 = 6 * 3600;

/// Default aggregation window end: 18:00 local
pub const DEFAULT_WINDOW_END_SECS: u32 = 18 * 3600;

/// Cadence and window configuration for the engine
///
/// Validated once at startup; the control loop assumes a valid config and
/// never re-checks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Seconds between samples
    pub sample_period_secs: u32,

    /// Daily aggregation window start, seconds after local midnight
    pub window_start_secs: u32,

    /// Daily aggregation window end, seconds after local midnight (exclusive)
    pub window_end_secs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_period_secs: DEFAULT_SAMPLE_PERIOD_SECS,
            window_start_secs: DEFAULT_WINDOW_START_SECS,
            window_end_secs: DEFAULT_WINDOW_END_SECS,
        }
    }
}

impl EngineConfig {
    /// Override the sampling period
    pub fn with_sample_period_secs(mut self, secs: u32) -> Self {
        self.sample_period_secs = secs;
        self
    }

    /// Override the aggregation window, in whole local hours
    pub fn with_window_hours(mut self, start: u32, end: u32) -> Self {
        self.window_start_secs = start * 3600;
        self.window_end_secs = end * 3600;
        self
    }

    /// Number of samples expected in a fully covered window
    pub fn expected_window_samples(&self) -> u32 {
        (self.window_end_secs - self.window_start_secs) / self.sample_period_secs
    }

    /// Validate the configuration
    ///
    /// The window span must be a whole multiple of the period, otherwise the
    /// expected-count arithmetic would never match actual coverage and no
    /// daily record could ever commit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_period_secs == 0 || SECS_PER_DAY % self.sample_period_secs != 0 {
            return Err(ConfigError::InvalidPeriod {
                period_secs: self.sample_period_secs,
            });
        }
        if self.window_start_secs >= self.window_end_secs {
            return Err(ConfigError::InvalidWindow {
                reason: "window start must precede end",
            });
        }
        if self.window_end_secs > SECS_PER_DAY {
            return Err(ConfigError::InvalidWindow {
                reason: "window end past midnight",
            });
        }
        if (self.window_end_secs - self.window_start_secs) % self.sample_period_secs != 0 {
            return Err(ConfigError::InvalidWindow {
                reason: "window span not a multiple of the period",
            });
        }
        Ok(())
    }
}
