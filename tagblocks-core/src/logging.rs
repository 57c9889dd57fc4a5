//! Logging infrastructure for tagblocks
//!
//! Logs are written to `~/.local/state/tagblocks/tagblocks.log` following XDG standards.
//! Each click runs inside a `click` span carrying the block's placement and
//! campaign IDs, so every line logged for that click (tracking transitions,
//! navigation, the error report) can be correlated back to the block.

use crate::config::{Config, LoggingConfig};
use crate::types::DisplayableBlock;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log file name inside the state directory
pub const LOG_FILE_NAME: &str = "tagblocks.log";

/// Initialize the logging system
///
/// Sets up tracing with:
/// - File output to XDG state directory
/// - Daily log rotation
/// - Configurable log level via config or RUST_LOG env var
/// - HTTP client internals capped at `warn` unless RUST_LOG says otherwise
pub fn init(config: &LoggingConfig) -> crate::error::Result<LoggingGuard> {
    let log_dir = Config::state_dir();

    // Create log directory if it doesn't exist
    std::fs::create_dir_all(&log_dir)?;

    // One file per day; tracking failures are easiest to find by date
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);

    // Non-blocking so a slow disk never stalls a click
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    // File layer - click spans are closed with their timing
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE);

    // A second init (e.g. a host that already installed a subscriber) is an error, not a panic
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::error::Error::Config(format!("failed to install logger: {}", e)))?;

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Filter directives for a configured level
///
/// reqwest and hyper log every connection at `debug`; at our `debug` level
/// that drowns the click transitions, so they stay at `warn`.
fn default_directives(level: &str) -> String {
    format!("{},hyper=warn,hyper_util=warn,reqwest=warn", level)
}

/// Span covering one click on `block`
///
/// Absent identifiers are recorded as empty strings.
pub fn click_span(block: &DisplayableBlock) -> tracing::Span {
    tracing::info_span!(
        "click",
        placement_id = block.placement_id.as_deref().unwrap_or(""),
        campaign_id = block.campaign_id.as_deref().unwrap_or(""),
    )
}

/// Initialize logging for tests (logs to stdout)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Guard that keeps the logging system alive
///
/// When dropped, flushes any pending log writes.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Returns the log file path
pub fn log_file_path() -> PathBuf {
    Config::log_path()
}
