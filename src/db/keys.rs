//! Storage key encoding.
//!
//! Keys are fixed-width UTC timestamps, so byte order is chronological order
//! and a plain `ORDER BY key` replaces any secondary index.

use chrono::{DateTime, Utc};

const KEY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";

pub fn encode_key(ts: &DateTime<Utc>) -> String {
    ts.format(KEY_FORMAT).to_string()
}

