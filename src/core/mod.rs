pub mod analytics;
pub mod backup;
pub mod scheduler;
pub mod tracker;

pub use tracker::Tracker;
