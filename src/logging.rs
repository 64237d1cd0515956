//! Tracing setup for the server binary.
//!
//! Events go to stdout with a compact formatter, filtered through `RUST_LOG`
//! (default `info`). A file layer is added when a log target can be opened:
//! the path in `PAPERLENS_LOG_FILE` if set, otherwise `logs/paperlens.log`.
//! File writes go through a non-blocking worker so request handlers never
//! block on disk.

use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// Dropping the guard flushes and stops the worker; pin it for the process
// lifetime.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global tracing subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout = fmt::layer().with_target(false).compact();
    let registry = tracing_subscriber::registry().with(filter).with(stdout);

    match open_log_writer() {
        Some(writer) => {
            let file = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .compact();
            registry.with(file).init();
        }
        None => registry.init(),
    }
}

/// Open the file log destination, if one is usable.
///
/// Failures are reported to stderr and degrade to stdout-only logging; a
/// read-only filesystem must not prevent the server from starting.
fn open_log_writer() -> Option<NonBlocking> {
    let (non_blocking, guard) = match std::env::var("PAPERLENS_LOG_FILE") {
        Ok(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|err| eprintln!("Failed to open log file {path}: {err}"))
                .ok()?;
            tracing_appender::non_blocking(file)
        }
        Err(_) => {
            std::fs::create_dir_all("logs")
                .map_err(|err| eprintln!("Failed to create logs directory: {err}"))
                .ok()?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(
                "logs",
                "paperlens.log",
            ))
        }
    };
    let _ = LOG_GUARD.set(guard);
    Some(non_blocking)
}
