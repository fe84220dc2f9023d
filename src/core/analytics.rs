//! Daily aggregation and streak computation.
//!
//! Pure functions over a slice of entries: "now" and its timezone are always
//! passed in by the caller, nothing here reads the system clock.

use crate::models::{DailyStats, LogEntry};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone};
use std::collections::HashSet;

/// Calendar day of `t` in its own timezone.
pub fn normalize_date<Tz: TimeZone>(t: &DateTime<Tz>) -> NaiveDate {
    t.date_naive()
}

/// Number of consecutive days with at least one entry, ending today or,
/// when today has nothing yet, yesterday.
pub fn calculate_streak<Tz: TimeZone>(entries: &[LogEntry], now: &DateTime<Tz>) -> u32 {
    if entries.is_empty() {
        return 0;
    }

    let tz = now.timezone();
    let days: HashSet<NaiveDate> = entries
        .iter()
        .map(|e| normalize_date(&e.occurred_at.with_timezone(&tz)))
        .collect();

    let mut day = normalize_date(now);
    if !days.contains(&day) {
        // la giornata non è ancora finita: si parte da ieri
        match day.checked_sub_days(Days::new(1)) {
            Some(d) => day = d,
            None => return 0,
        }
    }

    let mut streak = 0;
    while days.contains(&day) {
        streak += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(d) => day = d,
            None => break,
        }
    }
    streak
}

/// Counts and minutes for entries after the start of `now`'s day, plus the streak.
pub fn daily_stats<Tz: TimeZone>(entries: &[LogEntry], now: &DateTime<Tz>) -> DailyStats {
    let tz = now.timezone();
    let start_of_day = normalize_date(now).and_time(NaiveTime::MIN);

    let mut stats = DailyStats::default();

    for e in entries {
        // strictly after local midnight
        if e.occurred_at.with_timezone(&tz).naive_local() > start_of_day {
            stats.solved_today += 1;
            stats.minutes_today += e.duration_minutes;
        }
    }

    stats.streak = calculate_streak(entries, now);
    stats
}
