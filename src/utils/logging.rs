use std::sync::LazyLock;

use tracing::level_filters::LevelFilter;

use crate::errors::{AppError, AppResult};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
pub fn enable_logging(log_level: &str) -> AppResult<()> {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!(
            "{}={level}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
        )))
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Other(format!("cannot install logger: {e}")))
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
});
