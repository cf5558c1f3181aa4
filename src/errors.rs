//! Error types for the stress engine
//!
//! Kept in the same shape as the rest of the device firmware expects:
//!
//! 1. **Small and Copy**: errors cross the per-cycle hot path, so every
//!    variant carries inline data only (`&'static str`, an `io::ErrorKind`),
//!    never a heap-allocated message.
//!
//! 2. **Two-tier taxonomy**: startup errors (`EngineError`) are fatal and
//!    halt the device; everything per-cycle is handled locally by the engine
//!    and never aborts the control loop.

use thiserror_no_std::Error;

/// Result alias for log store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only log store errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Storage medium could not be opened or created
    ///
    /// Fatal at startup: without durable storage no sample can be recorded
    /// and continuing would silently lose data.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// What failed while bringing the medium up
        reason: &'static str,
    },

    /// Requested record index is beyond the current record count
    ///
    /// This is an ordinary out-of-bounds read, not corruption. Readers probe
    /// past the end when estimating day boundaries.
    #[error("record not found")]
    NotFound,

    /// Record or medium capacity exceeded
    #[error("store capacity exceeded")]
    Overflow,

    /// Stored bytes do not decode as a record
    #[error("corrupt record: {reason}")]
    Corrupt {
        /// Which decode step rejected the bytes
        reason: &'static str,
    },

    /// Underlying I/O failure (file medium)
    #[cfg(feature = "std")]
    #[error("i/o failure: {kind:?}")]
    Io {
        /// Error kind reported by the OS
        kind: std::io::ErrorKind,
    },
}

#[cfg(feature = "std")]
impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io { kind: err.kind() }
    }
}

/// Thermal sampler errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    /// Sensor did not respond at boot
    #[error("thermal sensor not detected")]
    NotDetected,

    /// Acquisition failed mid-run
    #[error("sensor fault: {reason}")]
    Fault {
        /// Driver-reported failure cause
        reason: &'static str,
    },
}

/// Configuration validation errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Sampling period is zero or does not divide a day evenly
    #[error("invalid sampling period: {period_secs}s")]
    InvalidPeriod {
        /// Rejected period
        period_secs: u32,
    },

    /// Aggregation window bounds are inverted, out of range, or ragged
    /// with respect to the sampling period
    #[error("invalid aggregation window: {reason}")]
    InvalidWindow {
        /// Which constraint was violated
        reason: &'static str,
    },
}

/// Fatal initialization errors
///
/// Everything here halts the device before the control loop starts. There is
/// no degraded mode: without storage or sensor, no meaningful operation is
/// possible.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Configuration rejected
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    /// Durable storage unavailable
    #[error("storage: {0}")]
    Storage(#[from] StoreError),

    /// Thermal sensor missing or faulted at boot
    #[error("sensor: {0}")]
    Sensor(#[from] SampleError),
}
