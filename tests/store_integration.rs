//! File-backed log store behavior on a real filesystem

mod common;

use std::io::Write;

use canopy_stress::{
    record::FixedRecord, store::FileMedium, AppendLog, DailyRecord, SampleRecord, StoreError,
};
use chrono::NaiveDate;

use common::{at, test_day};

fn sample(tick: u32, index: f32) -> SampleRecord {
    SampleRecord {
        timestamp: at(test_day(0), tick * 900),
        index,
        t_max: 30.0,
        t_min: 20.0,
        t_mean: 20.0 + 10.0 * index,
    }
}

#[test]
fn first_run_creates_file_with_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.log");

    let log = AppendLog::<SampleRecord, _>::open(FileMedium::new(&path)).unwrap();
    assert_eq!(log.count().unwrap(), 0);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, SampleRecord::HEADER);
}

#[test]
fn reopen_preserves_count_and_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.log");

    let mut log = AppendLog::<SampleRecord, _>::open(FileMedium::new(&path)).unwrap();
    for tick in 0..5 {
        log.append(&sample(tick, 0.1 * tick as f32)).unwrap();
    }
    drop(log);

    let log = AppendLog::<SampleRecord, _>::open(FileMedium::new(&path)).unwrap();
    assert_eq!(log.count().unwrap(), 5);

    let record = log.read(2).unwrap();
    assert!((record.index - 0.2).abs() < 1e-3);
    assert_eq!(record.timestamp, at(test_day(0), 2 * 900));

    assert_eq!(log.read(5), Err(StoreError::NotFound));
}

#[test]
fn rows_are_fixed_width_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.log");

    let mut log = AppendLog::<SampleRecord, _>::open(FileMedium::new(&path)).unwrap();
    for tick in 0..3 {
        log.append(&sample(tick, -0.25 + 0.5 * tick as f32)).unwrap();
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    let body = &contents[SampleRecord::HEADER.len()..];
    assert_eq!(body.len(), 3 * SampleRecord::ENCODED_LEN);
    for line in body.lines() {
        assert_eq!(line.len() + 1, SampleRecord::ENCODED_LEN);
    }
}

#[test]
fn torn_append_is_repaired_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.log");

    let mut log = AppendLog::<SampleRecord, _>::open(FileMedium::new(&path)).unwrap();
    log.append(&sample(0, 0.3)).unwrap();
    drop(log);

    // Power loss mid-append: half a row reaches the disk
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .unwrap();
    file.write_all(b"2025.06.01-00:15:00, 0.4").unwrap();
    drop(file);

    let mut log = AppendLog::<SampleRecord, _>::open(FileMedium::new(&path)).unwrap();
    assert_eq!(log.count().unwrap(), 1);

    // Appends after repair stay aligned
    log.append(&sample(1, 0.6)).unwrap();
    assert_eq!(log.count().unwrap(), 2);
    assert!((log.read(1).unwrap().index - 0.6).abs() < 1e-3);
}

#[test]
fn daily_log_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daily.log");

    let mut log = AppendLog::<DailyRecord, _>::open(FileMedium::new(&path)).unwrap();
    for day in 0..3u32 {
        log.append(&DailyRecord {
            date: NaiveDate::from_ymd_opt(2025, 6, 1 + day).unwrap(),
            mean_index: 0.4 + 0.1 * day as f32,
        })
        .unwrap();
    }

    let log = AppendLog::<DailyRecord, _>::open(FileMedium::new(&path)).unwrap();
    assert_eq!(log.count().unwrap(), 3);
    let last = log.last().unwrap().unwrap();
    assert_eq!(last.date, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
    assert!((last.mean_index - 0.6).abs() < 1e-3);
}
