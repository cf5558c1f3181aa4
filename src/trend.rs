//! Short-term trend estimation over the history window
//!
//! An ordinary least-squares line through the newest five daily aggregates,
//! with ordinal day numbers as x-values. The slope is the signal: fractional
//! index change per day, rendered as a percentage by the presentation layer.
//!
//! The fit always uses five points, padding included. Early in device life
//! that biases the slope toward the padding value; the display must always
//! show something, so the biased estimate is accepted and callers can check
//! [`HistoryWindow::real_len`] to qualify it.
//!
//! [`HistoryWindow::real_len`]: crate::history::HistoryWindow::real_len

use crate::history::HistoryWindow;

/// Points the trend line is fitted through
pub const TREND_POINTS: usize = 5;

/// Least-squares slope over the newest history entries
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrendEstimate {
    /// Fractional index change per day
    pub slope: f32,
}

impl TrendEstimate {
    /// Fit the newest [`TREND_POINTS`] entries of the window
    pub fn from_window(window: &HistoryWindow) -> Self {
        Self::fit(window.tail(TREND_POINTS))
    }

    /// Ordinary least-squares slope through `y` with x = 1, 2, .. n
    ///
    /// `slope = (mean(xy) - mean(x)*mean(y)) / (mean(x^2) - mean(x)^2)`
    pub fn fit(y: &[f32]) -> Self {
        if y.len() < 2 {
            return Self { slope: 0.0 };
        }

        let n = y.len() as f32;
        let mut sum_x = 0.0f32;
        let mut sum_y = 0.0f32;
        let mut sum_xy = 0.0f32;
        let mut sum_x2 = 0.0f32;
        for (i, value) in y.iter().enumerate() {
            let x = (i + 1) as f32;
            sum_x += x;
            sum_y += value;
            sum_xy += x * value;
            sum_x2 += x * x;
        }

        let mean_x = sum_x / n;
        let denom = sum_x2 / n - mean_x * mean_x;
        if denom == 0.0 {
            return Self { slope: 0.0 };
        }

        Self {
            slope: (sum_xy / n - mean_x * (sum_y / n)) / denom,
        }
    }

    /// Slope as percent of index per day, for rendering
    pub fn percent_per_day(&self) -> f32 {
        self.slope * 100.0
    }
}
