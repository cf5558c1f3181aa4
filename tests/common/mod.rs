//! Shared helpers for the integration suites

#![allow(dead_code)]

use std::collections::VecDeque;

use canopy_stress::{SampleError, Sampler, ThermalReading};
use chrono::{NaiveDate, NaiveDateTime};

/// Baseline frame temperatures used by all synthetic days
pub const T_MIN: f32 = 20.0;
pub const T_MAX: f32 = 30.0;

/// A reading whose stress index comes out exactly `index`
pub fn reading_with_index(index: f32) -> ThermalReading {
    ThermalReading {
        t_max: T_MAX,
        t_min: T_MIN,
        t_mean: T_MIN + (T_MAX - T_MIN) * index,
    }
}

/// A degenerate (contrast-free) reading
pub fn degenerate_reading() -> ThermalReading {
    ThermalReading {
        t_max: 25.0,
        t_min: 25.0,
        t_mean: 25.0,
    }
}

/// Local time `secs` after midnight on `date`
pub fn at(date: NaiveDate, secs: u32) -> NaiveDateTime {
    date.and_hms_opt(secs / 3600, (secs % 3600) / 60, secs % 60)
        .unwrap()
}

pub fn test_day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap() + chrono::Duration::days(offset as i64)
}

/// Sampler that replays a scripted sequence of acquisition results
pub struct ScriptedSampler {
    frames: VecDeque<nb::Result<ThermalReading, SampleError>>,
}

impl ScriptedSampler {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::new(),
        }
    }

    pub fn push(&mut self, frame: nb::Result<ThermalReading, SampleError>) {
        self.frames.push_back(frame);
    }

    pub fn push_index(&mut self, index: f32) {
        self.push(Ok(reading_with_index(index)));
    }

    pub fn push_missing(&mut self) {
        self.push(Err(nb::Error::WouldBlock));
    }
}

impl Sampler for ScriptedSampler {
    fn acquire(&mut self) -> nb::Result<ThermalReading, SampleError> {
        self.frames
            .pop_front()
            .unwrap_or(Err(nb::Error::WouldBlock))
    }
}
