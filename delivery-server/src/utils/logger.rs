//! Logging Infrastructure
//!
//! `RUST_LOG` wins over the configured level when set. With a log
//! directory, events are also written to a daily rolling file.

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_DIRECTIVES: &str = "delivery_server=info,tower_http=info,security=info";

/// Initialize the logger (stdout only)
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match log_level {
        Some(level) => EnvFilter::new(format!("{level},sqlx=warn")),
        None => EnvFilter::new(DEFAULT_DIRECTIVES),
    });

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    let file_layer = log_dir
        .map(Path::new)
        .filter(|path| path.exists())
        .map(|path| {
            let file_appender = tracing_appender::rolling::daily(path, "delivery-server");
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(file_appender)
        });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init();
}
