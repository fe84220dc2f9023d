use crate::db::Store;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

pub const BACKUP_PREFIX: &str = "backup-";
pub const BACKUP_EXTENSION: &str = ".json";
pub const DEFAULT_RETENTION: usize = 150;

const SUFFIX_WIDTH: usize = 6;
const MAX_SUFFIX: u32 = 999_999;

/// Snapshot writer and retention policy for the `backups/` directory.
#[derive(Debug, Clone)]
pub struct BackupLogic {
    dir: PathBuf,
    retention: usize,
}

impl BackupLogic {
    /// `retention` below 1 is raised to 1 so a tick never deletes its own snapshot.
    pub fn new(dir: impl Into<PathBuf>, retention: usize) -> Self {
        Self {
            dir: dir.into(),
            retention: retention.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// One rotation tick: snapshot every entry, then prune old snapshots.
    ///
    /// Returns the path of the new snapshot.
    pub fn run_tick(&self, store: &Store) -> AppResult<PathBuf> {
        // 1️⃣ Read everything (read transaction only, released before any file I/O)
        let entries = store.get_all()?;

        // 2️⃣ Serialize: an empty store still produces `[]`
        let data = serde_json::to_string_pretty(&entries)?;

        // 3️⃣ Write the snapshot
        fs::create_dir_all(&self.dir)?;
        let path = self.next_snapshot_path(&store.now())?;
        write_atomically(&path, data.as_bytes())?;
        info!(
            "backup created: {} ({} entries)",
            path.display(),
            entries.len()
        );

        // 4️⃣ Retention
        self.rotate()?;

        Ok(path)
    }

    /// Deletes the oldest snapshots beyond the retention count.
    ///
    /// Returns the deleted paths, oldest first.
    pub fn rotate(&self) -> AppResult<Vec<PathBuf>> {
        let mut names = self.list_snapshots()?;
        names.sort();

        let mut deleted = Vec::new();
        if names.len() > self.retention {
            let excess = names.len() - self.retention;
            for name in names.drain(..excess) {
                let path = self.dir.join(&name);
                info!("deleting old backup: {name}");
                fs::remove_file(&path)?;
                deleted.push(path);
            }
        }

        Ok(deleted)
    }

    /// File names in the backup directory that follow the snapshot naming scheme.
    pub fn list_snapshots(&self) -> AppResult<Vec<String>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if is_snapshot_name(&name) {
                out.push(name);
            }
        }
        Ok(out)
    }

    /// `backup-YYYY-MM-DD_HH-MM-SS.json`, or `..._NNNNNN.json` when that second
    /// already has snapshots.
    ///
    /// The suffix is one past the highest one on disk for that second, so the
    /// new name always sorts after every snapshot taken in the same second,
    /// even when rotation already removed the plain name. `_` sorts after `.`.
    fn next_snapshot_path(&self, now: &DateTime<Utc>) -> AppResult<PathBuf> {
        let stamp = now.format("%Y-%m-%d_%H-%M-%S").to_string();
        let base = format!("{BACKUP_PREFIX}{stamp}");

        let highest = self
            .list_snapshots()?
            .iter()
            .filter_map(|name| same_second_suffix(name, &base))
            .max();

        let name = match highest {
            None => format!("{base}{BACKUP_EXTENSION}"),
            Some(n) if n < MAX_SUFFIX => {
                format!("{base}_{:0width$}{BACKUP_EXTENSION}", n + 1, width = SUFFIX_WIDTH)
            }
            Some(_) => {
                return Err(AppError::from(io::Error::other(format!(
                    "too many backups within {stamp}"
                ))));
            }
        };

        Ok(self.dir.join(name))
    }
}

/// 0 for the plain name, N for `_N`; `None` when `name` belongs to another second.
fn same_second_suffix(name: &str, base: &str) -> Option<u32> {
    let rest = name.strip_prefix(base)?.strip_suffix(BACKUP_EXTENSION)?;
    if rest.is_empty() {
        return Some(0);
    }
    let digits = rest.strip_prefix('_')?;
    if digits.len() != SUFFIX_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub fn is_snapshot_name(name: &str) -> bool {
    name.starts_with(BACKUP_PREFIX) && name.ends_with(BACKUP_EXTENSION)
}

/// Write to a hidden temp file first, then rename, so a crash never leaves a
/// truncated file matching the snapshot pattern.
fn write_atomically(path: &Path, data: &[u8]) -> AppResult<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    fs::write(&tmp, data)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
