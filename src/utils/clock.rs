use chrono::{DateTime, Utc};

/// Source of "now" for the store and the backup rotator. Swapped out in tests
/// to get deterministic keys and file names.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
