//! Entry point for collaborators (terminal form, reminder scheduler, calendar sync).

use crate::config::Config;
use crate::core::analytics;
use crate::core::backup::BackupLogic;
use crate::core::scheduler::BackupScheduler;
use crate::db::Store;
use crate::errors::AppResult;
use crate::export::{ExportFormat, ExportLogic};
use crate::models::{DailyStats, LogEntry};
use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct Tracker {
    store: Arc<Store>,
    backup: BackupLogic,
    export_file: PathBuf,
}

impl Tracker {
    pub fn new(store: Arc<Store>, backup: BackupLogic, export_file: impl Into<PathBuf>) -> Self {
        Self {
            store,
            backup,
            export_file: export_file.into(),
        }
    }

    /// Opens the configured store and wires backup and export locations.
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let store = Store::open(cfg.database_path())?;
        Ok(Self::new(
            Arc::new(store),
            BackupLogic::new(cfg.backup_path(), cfg.backup_retention),
            cfg.export_path(),
        ))
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn insert(&self, entry: &mut LogEntry) -> AppResult<()> {
        self.store.insert(entry)
    }

    pub fn get_all(&self) -> AppResult<Vec<LogEntry>> {
        self.store.get_all()
    }

    pub fn update(&self, entry: &LogEntry) -> AppResult<()> {
        self.store.update(entry)
    }

    pub fn delete_by_timestamp(&self, ts: &DateTime<Utc>) -> AppResult<()> {
        self.store.delete_by_timestamp(ts)
    }

    /// Stats for the day containing `now`, in `now`'s timezone.
    pub fn daily_stats<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> AppResult<DailyStats> {
        let entries = self.store.get_all()?;
        Ok(analytics::daily_stats(&entries, now))
    }

    pub fn run_backup_tick(&self) -> AppResult<PathBuf> {
        self.backup.run_tick(&self.store)
    }

    /// Exports to the configured file, format picked from its extension.
    pub fn export(&self) -> AppResult<PathBuf> {
        self.export_to(&self.export_file, ExportFormat::from_path(&self.export_file))
    }

    pub fn export_to(&self, path: &Path, format: ExportFormat) -> AppResult<PathBuf> {
        ExportLogic::export(&self.store, format, path)
    }

    /// Starts periodic backups sharing this tracker's store. Must be called
    /// from within a tokio runtime.
    pub fn spawn_backup_scheduler(
        &self,
        every: Duration,
        shutdown: CancellationToken,
    ) -> BackupScheduler {
        BackupScheduler::spawn(Arc::clone(&self.store), self.backup.clone(), every, shutdown)
    }

    pub fn close(&self) -> AppResult<()> {
        self.store.close()
    }
}
