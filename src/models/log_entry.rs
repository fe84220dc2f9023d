use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One logged practice session.
///
/// `occurred_at` is the storage key: inserting always overwrites it with the
/// insertion time, updating reuses it to find the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub external_ref: String, // ⇔ export "Question ID"
    pub source: String,       // ⇔ export "Platform"
    pub category: String,     // ⇔ export "Topic"
    pub level: String,        // ⇔ export "Difficulty"
    pub duration_minutes: i64,
    pub notes: String,
    pub occurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_event_ref: Option<String>,
}

impl LogEntry {
    /// Builds an entry as submitted by a form: `id` is left empty (generated on
    /// insert) and `occurred_at` is a placeholder overwritten by the store.
    pub fn new(
        source: impl Into<String>,
        external_ref: impl Into<String>,
        category: impl Into<String>,
        level: impl Into<String>,
        duration_minutes: i64,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            external_ref: external_ref.into(),
            source: source.into(),
            category: category.into(),
            level: level.into(),
            duration_minutes,
            notes: notes.into(),
            occurred_at: DateTime::<Utc>::default(),
            external_event_ref: None,
        }
    }

    /// Calendar day of the entry in local time.
    pub fn local_date(&self) -> NaiveDate {
        self.occurred_at.with_timezone(&Local).date_naive()
    }

    pub fn date_str(&self) -> String {
        self.local_date().format("%Y-%m-%d").to_string()
    }
}
