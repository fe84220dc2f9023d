use rusqlite::{Connection, OptionalExtension, Result};
use tracing::{debug, info};

/// Current layout of the store file, recorded in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;

/// Check if the `logs` collection exists.
pub fn logs_table_exists(conn: &Connection) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='logs'")?;
    let exists: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Initialize the store file.
///
/// Safe to run on every open: the collection is created only when missing and
/// the journal mode switch is a no-op once WAL is active.
pub fn init_db(conn: &Connection) -> Result<()> {
    // WAL: i lettori non bloccano l'unico writer
    let mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
    debug!("journal mode: {mode}");

    if !logs_table_exists(conn)? {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS logs (
                key   TEXT PRIMARY KEY NOT NULL,  -- YYYY-MM-DDTHH:MM:SS.nnnnnnnnnZ
                value BLOB NOT NULL               -- JSON encoded LogEntry
            ) WITHOUT ROWID;
            "#,
        )?;
        info!("created logs collection");
    }

    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))?;
    }

    Ok(())
}
