use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;
use wallet_budget::{Budget, Config, FixedClock};

/// Opens a budget over a fresh temporary data root. Keep the `TempDir` alive for the test.
pub fn setup_budget(now: NaiveDateTime) -> (Budget, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let config = Config {
        data_root: Some(temp.path().join("data")),
        ..Config::default()
    };
    let budget = Budget::open(config)
        .expect("open budget")
        .with_clock(Arc::new(FixedClock(now)));
    (budget, temp)
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(h, 0, 0)
        .expect("valid time")
}
