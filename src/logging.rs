use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
///
/// Console output goes to stderr so command output on stdout stays clean.
pub fn init_logging() {
    init_logging_in("logs");
}

/// Same as [`init_logging`] with the JSON log files written under `log_dir`.
pub fn init_logging_in(log_dir: &str) {
    // Ensure logs directory exists
    let _ = fs::create_dir_all(log_dir);

    // Daily rotating JSON file log
    let file_appender = tracing_appender::rolling::daily(log_dir, "scholarship_cleaner.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scholarship_cleaner=info"));

    // try_init so a second call (e.g. from tests) does not panic
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    // Keep the worker alive for the whole process so logs are flushed
    std::mem::forget(guard);
}
