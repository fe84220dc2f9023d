//! practicelog library root.
//! Embedded practice-session store, daily analytics, rotating backups and
//! spreadsheet export. Collaborators go through [`crate::core::Tracker`].

pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use crate::config::Config;
use crate::core::Tracker;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success, warning};
use chrono::Local;
use tokio_util::sync::CancellationToken;

/// Waits for Ctrl+C and cancels the token.
pub async fn detect_shutdown(cancellation: CancellationToken) {
    tokio::select! {
        r = tokio::signal::ctrl_c() => {
            if let Err(e) = r {
                warning(format!("cannot listen for Ctrl+C: {e}"));
            }
            cancellation.cancel();
        },
        _ = cancellation.cancelled() => (),
    }
}

/// Entry point usato da main.rs
pub async fn run() -> AppResult<()> {
    // 1️⃣ carica config UNA sola volta
    let cfg = Config::init_all()?;

    // 2️⃣ logging
    utils::logging::enable_logging(&cfg.log_level)?;

    // 3️⃣ store + stats
    let tracker = Tracker::from_config(&cfg)?;
    let stats = tracker.daily_stats(&Local::now())?;

    header("practicelog");
    info(format!("Store:        {}", tracker.store().path().display()));
    info(format!(
        "Today:        {} solved, {} min",
        stats.solved_today, stats.minutes_today
    ));
    info(format!("Streak:       {} day(s)", stats.streak));

    // 4️⃣ backup periodici fino a Ctrl+C
    let shutdown = CancellationToken::new();
    let scheduler = tracker.spawn_backup_scheduler(cfg.backup_interval(), shutdown.clone());
    info(format!(
        "Backups every {:?} into {} (keeping {})",
        cfg.backup_interval(),
        cfg.backup_path().display(),
        cfg.backup_retention
    ));

    detect_shutdown(shutdown).await;
    scheduler.stop().await?;
    tracker.close()?;

    success("Shutdown complete.");
    Ok(())
}
