//! Tracing setup for the segmentation server.
//!
//! Logs go to stdout with a compact formatter. A file layer is added when possible:
//! `DOCSEG_LOG_FILE` names an explicit target, otherwise `logs/docseg.log` is used.
//! File writes go through a non-blocking writer so request handling never waits on disk.
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and optional file logging.
///
/// `RUST_LOG` controls filtering and defaults to `info`. The non-blocking writer
/// guard lives in a global so the file layer stays alive for the process lifetime.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match file_writer() {
        Some(writer) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            registry.with(file_layer).init();
        }
        None => registry.init(),
    }
}

fn file_writer() -> Option<NonBlocking> {
    let path = match std::env::var("DOCSEG_LOG_FILE") {
        Ok(path) => PathBuf::from(path),
        Err(_) => {
            if let Err(err) = std::fs::create_dir_all("logs") {
                eprintln!("Failed to create logs directory: {err}");
                return None;
            }
            PathBuf::from("logs/docseg.log")
        }
    };

    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(non_blocking)
        }
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.display());
            None
        }
    }
}
