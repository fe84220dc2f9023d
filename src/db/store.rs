//! Embedded log store: one SQLite file, one `logs` collection keyed by timestamp.

use crate::db::initialize::init_db;
use crate::db::keys::encode_key;
use crate::errors::{AppError, AppResult};
use crate::models::LogEntry;
use crate::utils::clock::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::Value;
use rusqlite::{Connection, TransactionBehavior, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Handle to the store file.
///
/// Shared as `Arc<Store>` between interactive callers and the backup scheduler.
/// The connection is locked for the length of a single transaction only.
pub struct Store {
    path: PathBuf,
    conn: Mutex<Option<Connection>>,
    clock: Box<dyn Clock>,
}

impl Store {
    /// Opens (or creates) the store file and makes sure the collection exists.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        Self::open_with_clock(path, SystemClock)
    }

    pub fn open_with_clock(path: impl AsRef<Path>, clock: impl Clock) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        init_db(&conn)?;
        debug!("opened store {}", path.display());

        Ok(Self {
            path,
            conn: Mutex::new(Some(conn)),
            clock: Box::new(clock),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Closes the underlying connection. Later calls fail with `NotInitialized`.
    pub fn close(&self) -> AppResult<()> {
        if let Some(conn) = self.conn.lock().take() {
            conn.close().map_err(|(_, e)| AppError::Db(e))?;
            debug!("closed store {}", self.path.display());
        }
        Ok(())
    }

    /// Current time according to the store clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn is_open(&self) -> bool {
        self.conn.lock().is_some()
    }

    /// Helper to execute a closure with a mutable connection reference.
    fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut guard = self.conn.lock();
        let conn = guard.as_mut().ok_or(AppError::NotInitialized)?;
        func(conn)
    }

    /// Stores a new entry as "now".
    ///
    /// `occurred_at` is always overwritten with the current time and a missing
    /// `id` is generated. An entry already stored at the same instant is replaced.
    pub fn insert(&self, entry: &mut LogEntry) -> AppResult<()> {
        entry.occurred_at = self.clock.now();
        if entry.id.is_empty() {
            entry.id = Uuid::new_v4().to_string();
        }
        self.put(entry)
    }

    /// Overwrites the value stored at `entry.occurred_at`.
    ///
    /// If the timestamp was changed after reading, this writes a second entry.
    pub fn update(&self, entry: &LogEntry) -> AppResult<()> {
        self.put(entry)
    }

    fn put(&self, entry: &LogEntry) -> AppResult<()> {
        let key = encode_key(&entry.occurred_at);
        let value = serde_json::to_vec(entry)?;

        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute(
                "INSERT OR REPLACE INTO logs (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    /// Removes the entry stored at `ts`. Missing keys are not an error.
    pub fn delete_by_timestamp(&self, ts: &DateTime<Utc>) -> AppResult<()> {
        let key = encode_key(ts);

        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let n = tx.execute("DELETE FROM logs WHERE key = ?1", params![key])?;
            tx.commit()?;
            if n == 0 {
                debug!("delete: no entry at {key}");
            }
            Ok(())
        })
    }

    /// Returns every entry in chronological order.
    ///
    /// Values that cannot be decoded are logged and skipped.
    pub fn get_all(&self) -> AppResult<Vec<LogEntry>> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;

            let mut out = Vec::new();
            {
                let mut stmt = tx.prepare_cached("SELECT key, value FROM logs ORDER BY key ASC")?;
                // Both columns are read as raw values: a foreign key type is a
                // corrupt row, not a failed scan.
                let rows = stmt.query_map([], |row| {
                    let key = row.get::<_, Value>(0)?;
                    let value = match row.get::<_, Value>(1)? {
                        Value::Blob(b) => b,
                        Value::Text(s) => s.into_bytes(),
                        _ => Vec::new(),
                    };
                    Ok((key, value))
                })?;

                for r in rows {
                    let (key, value) = r?;
                    let key = match key {
                        Value::Text(k) => k,
                        other => {
                            warn!("skipping entry with non-text key {other:?}");
                            continue;
                        }
                    };
                    match serde_json::from_slice::<LogEntry>(&value) {
                        Ok(entry) => out.push(entry),
                        Err(e) => warn!("skipping unreadable entry at {key}: {e}"),
                    }
                }
            }

            tx.commit()?;
            Ok(out)
        })
    }

    pub fn count(&self) -> AppResult<usize> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))?;
            Ok(n as usize)
        })
    }
}
