//! Thermal sampling and stress index calculation
//!
//! One acquisition cycle reduces a thermal frame to three scalars: maximum,
//! minimum, and mean canopy surface temperature. The stress index is the
//! normalized position of the mean between the observed extremes, a
//! CWSI-equivalent proxy: 0 means the canopy sits at the cold (transpiring)
//! end of the scene, 1 at the hot (stressed) end.
//!
//! Frame acquisition itself is an external collaborator behind the
//! [`Sampler`] trait; this module only defines the seam and the pure index
//! derivation.

use crate::errors::SampleError;

/// Scalar reduction of one thermal frame
///
/// All three fields are in the same unit (degrees Celsius on the deployed
/// device). `t_min <= t_mean <= t_max` is expected but not enforced; sensor
/// noise may violate it and the index is simply allowed out of [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThermalReading {
    /// Maximum surface temperature in the frame
    pub t_max: f32,
    /// Minimum surface temperature in the frame
    pub t_min: f32,
    /// Mean surface temperature over the frame
    pub t_mean: f32,
}

impl ThermalReading {
    /// Compute the stress index for this reading
    ///
    /// `(t_mean - t_min) / (t_max - t_min)`, dimensionless, nominally in
    /// [0, 1] but deliberately not clamped: out-of-range values carry
    /// information about sensor noise and callers must tolerate them.
    ///
    /// Returns `None` when the reading is degenerate: `t_max == t_min`
    /// (sensor saturation or a contrast-free scene) or any field non-finite.
    /// A non-finite value must never reach the log or the regression, so the
    /// guard lives here rather than in every caller.
    pub fn stress_index(&self) -> Option<f32> {
        if !self.t_max.is_finite() || !self.t_min.is_finite() || !self.t_mean.is_finite() {
            return None;
        }

        let spread = self.t_max - self.t_min;
        if spread == 0.0 {
            return None;
        }

        Some((self.t_mean - self.t_min) / spread)
    }
}

/// Thermal frame sampler
///
/// One call per control-loop cycle. `nb::Error::WouldBlock` signals "no data
/// this cycle": the cycle is skipped, nothing is logged, and the previously
/// displayed values remain.
pub trait Sampler {
    /// Check the sensor is present at boot
    ///
    /// Failure here is fatal; the device halts rather than run blind.
    fn probe(&mut self) -> Result<(), SampleError> {
        Ok(())
    }

    /// Acquire one frame's scalar set
    fn acquire(&mut self) -> nb::Result<ThermalReading, SampleError>;
}
