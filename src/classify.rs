//! Severity and trend banding for presentation
//!
//! Pure threshold mappings from the continuous index and slope to the three
//! discrete states the display and the physical indicator can show. The
//! inequalities are part of the interface: boundary readings must classify
//! the same way on every device.

/// Stress severity band for the current index
///
/// `index <= 0.33` is Low, `index >= 0.66` is High, in between is Medium.
/// Non-finite input classifies Low rather than leaking NaN comparison
/// quirks into the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Severity {
    /// Canopy well watered
    Low = 0,
    /// Stress developing
    Medium = 1,
    /// Canopy under stress
    High = 2,
}

impl Severity {
    /// Band for a stress index value
    pub fn from_index(index: f32) -> Self {
        if !index.is_finite() || index <= 0.33 {
            Severity::Low
        } else if index < 0.66 {
            Severity::Medium
        } else {
            Severity::High
        }
    }

    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Direction band for the trend slope
///
/// Thresholds at plus/minus 0.1 index per day, independent of the severity
/// classification: a highly stressed canopy can still be recovering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TrendBand {
    /// Slope at or above +0.1 per day
    Rising = 0,
    /// Slope within the +-0.1 dead band
    Steady = 1,
    /// Slope at or below -0.1 per day
    Falling = 2,
}

impl TrendBand {
    /// Band for a fractional-per-day slope
    pub fn from_slope(slope: f32) -> Self {
        if slope >= 0.1 {
            TrendBand::Rising
        } else if slope <= -0.1 {
            TrendBand::Falling
        } else {
            // Non-finite slopes cannot occur (the fit is over finite
            // inputs), but they would land here as Steady.
            TrendBand::Steady
        }
    }

    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            TrendBand::Rising => "rising",
            TrendBand::Steady => "steady",
            TrendBand::Falling => "falling",
        }
    }
}
