pub mod daily_stats;
pub mod log_entry;

pub use daily_stats::DailyStats;
pub use log_entry::LogEntry;
