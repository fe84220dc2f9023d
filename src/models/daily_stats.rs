use serde::Serialize;

/// Aggregates for the current day plus the running streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    pub solved_today: usize,
    pub minutes_today: i64,
    pub streak: u32,
}
