// src/export/model.rs

use crate::models::LogEntry;

/// Header shared by every tabular export.
pub const HEADERS: [&str; 7] = [
    "Date",
    "Platform",
    "Question ID",
    "Topic",
    "Difficulty",
    "Time Spent (mins)",
    "Notes",
];

pub(crate) fn get_headers() -> Vec<&'static str> {
    HEADERS.to_vec()
}

/// Convert an entry into a row of strings, in header order.
pub(crate) fn entry_to_row(e: &LogEntry) -> Vec<String> {
    vec![
        e.date_str(),
        e.source.clone(),
        e.external_ref.clone(),
        e.category.clone(),
        e.level.clone(),
        e.duration_minutes.to_string(),
        e.notes.clone(),
    ]
}

/// Index of the numeric "Time Spent (mins)" column.
pub(crate) const DURATION_COL: usize = 5;
