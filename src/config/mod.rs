use crate::core::backup::DEFAULT_RETENTION;
use crate::core::scheduler::DEFAULT_BACKUP_INTERVAL;
use crate::errors::{AppError, AppResult};
use crate::export::DEFAULT_EXPORT_FILE;
use crate::utils::path::{desktop_or_home, expand_tilde};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default = "default_backup_interval_secs")]
    pub backup_interval_secs: u64,
    #[serde(default = "default_export_file")]
    pub export_file: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_backup_dir() -> String {
    Config::config_dir()
        .join("backups")
        .to_string_lossy()
        .to_string()
}
fn default_backup_retention() -> usize {
    DEFAULT_RETENTION
}
fn default_backup_interval_secs() -> u64 {
    DEFAULT_BACKUP_INTERVAL.as_secs()
}
fn default_export_file() -> String {
    desktop_or_home()
        .join(DEFAULT_EXPORT_FILE)
        .to_string_lossy()
        .to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            backup_dir: default_backup_dir(),
            backup_retention: default_backup_retention(),
            backup_interval_secs: default_backup_interval_secs(),
            export_file: default_export_file(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("practicelog")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".practicelog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("practicelog.conf")
    }

    /// Return the full path of the store file
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("practicelog.db")
    }

    /// Load configuration from the default file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            AppError::Config(format!("cannot parse {}: {e}", path.display()))
        })
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| AppError::Config(format!("cannot serialize config: {e}")))?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Create the configuration directory and write a default config file if
    /// none exists yet. Returns the effective configuration.
    pub fn init_all() -> AppResult<Self> {
        fs::create_dir_all(Self::config_dir())?;

        let file = Self::config_file();
        if file.exists() {
            return Self::load_from(&file);
        }

        let cfg = Self::default();
        cfg.save_to(&file)?;
        Ok(cfg)
    }

    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    pub fn backup_path(&self) -> PathBuf {
        expand_tilde(&self.backup_dir)
    }

    pub fn export_path(&self) -> PathBuf {
        expand_tilde(&self.export_file)
    }

    pub fn backup_interval(&self) -> Duration {
        Duration::from_secs(self.backup_interval_secs)
    }
}
