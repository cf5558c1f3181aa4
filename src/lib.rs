//! Canopy stress aggregation and trend engine
//!
//! Computes, persists, and trends a bounded crop-canopy stress index from
//! periodic thermal-imaging samples. Designed for a single-purpose offline
//! edge device: fixed-size buffers, append-only logs, no background tasks.
//!
//! Key constraints:
//! - No heap allocation in the record path
//! - Sequential-only log access (no random-access index)
//! - A partially covered day never pollutes long-term records
//!
//! ```no_run
//! use canopy_stress::{
//!     AppendLog, DailyRecord, Engine, EngineConfig, SampleRecord, SystemClock,
//!     store::FileMedium,
//! };
//! # use canopy_stress::{Sampler, SampleError, ThermalReading};
//! # struct Camera;
//! # impl Sampler for Camera {
//! #     fn acquire(&mut self) -> nb::Result<ThermalReading, SampleError> {
//! #         Ok(ThermalReading { t_max: 30.0, t_min: 20.0, t_mean: 24.0 })
//! #     }
//! # }
//!
//! # fn main() -> Result<(), canopy_stress::EngineError> {
//! let events = AppendLog::<SampleRecord, _>::open(FileMedium::new("samples.log"))?;
//! let daily = AppendLog::<DailyRecord, _>::open(FileMedium::new("daily.log"))?;
//!
//! let mut engine = Engine::new(Camera, SystemClock, events, daily, EngineConfig::default())?;
//! loop {
//!     if let Some(output) = engine.poll() {
//!         // Hand output to the display / indicator
//!         let _ = output.severity;
//!     }
//! }
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod classify;
pub mod config;
pub mod daily;
pub mod engine;
pub mod errors;
pub mod history;
pub mod record;
pub mod sample;
pub mod store;
pub mod time;
pub mod trend;

// Public API
pub use classify::{Severity, TrendBand};
pub use config::EngineConfig;
pub use daily::{DailyAggregator, DayStatus};
pub use engine::{CycleOutput, Engine};
pub use errors::{ConfigError, EngineError, SampleError, StoreError};
pub use history::HistoryWindow;
pub use record::{DailyRecord, FixedRecord, SampleRecord};
pub use sample::{Sampler, ThermalReading};
pub use store::AppendLog;
pub use time::Clock;
#[cfg(feature = "std")]
pub use time::SystemClock;
pub use trend::TrendEstimate;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
