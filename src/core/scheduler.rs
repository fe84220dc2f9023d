use crate::core::backup::BackupLogic;
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};

/// Default time between two snapshots.
pub const DEFAULT_BACKUP_INTERVAL: Duration = Duration::from_secs(30 * 60 * 60);

/// Periodic backup task bound to a cancellation token.
pub struct BackupScheduler {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl BackupScheduler {
    /// Starts the backup loop on the current tokio runtime.
    ///
    /// The first snapshot is taken one full `every` after start. Ticks never
    /// overlap: a slow snapshot delays the next tick, missed ticks are skipped.
    pub fn spawn(
        store: Arc<Store>,
        logic: BackupLogic,
        every: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        let every = every.max(Duration::from_millis(1));
        let handle = tokio::spawn(
            run_loop(store, logic, every, shutdown.clone()).instrument(info_span!("backup")),
        );
        Self { shutdown, handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancels the loop and waits for an in-flight snapshot to finish.
    pub async fn stop(self) -> AppResult<()> {
        self.shutdown.cancel();
        self.handle
            .await
            .map_err(|e| AppError::Other(format!("backup task failed: {e}")))
    }
}

async fn run_loop(
    store: Arc<Store>,
    logic: BackupLogic,
    every: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "periodic backup service started: every {:?} into {}",
        every,
        logic.dir().display()
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("periodic backup service stopped");
                return;
            }
            _ = ticker.tick() => ()
        }

        debug!("ticker ticked, performing backup");
        let store = Arc::clone(&store);
        let logic = logic.clone();

        match tokio::task::spawn_blocking(move || logic.run_tick(&store)).await {
            Ok(Ok(path)) => debug!("backup tick done: {}", path.display()),
            Ok(Err(e)) => error!("failed to perform periodic backup: {e}"),
            Err(e) => error!("backup tick aborted: {e}"),
        }
    }
}
