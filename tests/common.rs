#![allow(dead_code)]
use chrono::{DateTime, Duration, TimeZone, Utc};
use practicelog::db::Store;
use practicelog::models::LogEntry;
use practicelog::utils::clock::Clock;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    pub fn at(t: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(t)))
    }

    pub fn set(&self, t: DateTime<Utc>) {
        *self.0.lock().unwrap() = t;
    }

    pub fn advance(&self, d: Duration) {
        let mut t = self.0.lock().unwrap();
        *t += d;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

/// Open a store file inside `dir` driven by a manual clock.
pub fn open_store(dir: &Path, start: DateTime<Utc>) -> (Store, ManualClock) {
    let clock = ManualClock::at(start);
    let store = Store::open_with_clock(dir.join("practicelog.db"), clock.clone()).expect("open store");
    (store, clock)
}

pub fn sample(question: &str, minutes: i64) -> LogEntry {
    LogEntry::new(
        "Codeforces",
        question,
        "DP",
        "Medium",
        minutes,
        format!("notes for {question}"),
    )
}

/// Entry placed directly at `at`, for the pure analytics functions.
pub fn entry_at(at: DateTime<Utc>, minutes: i64) -> LogEntry {
    let mut e = sample("X", minutes);
    e.occurred_at = at;
    e
}
