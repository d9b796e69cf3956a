//! Logging setup for the CLI.

use std::path::{Path, PathBuf};

use ftlog::{
    appender::{FileAppender, Period},
    LevelFilter, LoggerGuard,
};

/// Configures the logger to write to `<log_dir>/<file_name>.log`, rotated
/// daily.
///
/// The returned guard must be kept alive for the rest of the run, or buffered
/// lines may be lost.
///
/// # Errors
///
/// - If the logs directory could not be created.
/// - If the logger could not be initialized.
pub fn configure_logger(log_dir: &Path, file_name: &str) -> Result<(LoggerGuard, PathBuf), String> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir).map_err(|e| e.to_string())?;
    }
    let logs_dir = log_dir.canonicalize().map_err(|e| e.to_string())?;
    let log_path = logs_dir.join(format!("{file_name}.log"));

    let writer = FileAppender::builder().path(&log_path).rotate(Period::Day).build();

    let err_path = log_path.with_extension("err.log");

    let guard = ftlog::Builder::new()
        // global max log level
        .max_log_level(LevelFilter::Info)
        .root(writer)
        // problems inside the appender itself go to `err_path`
        .filter("ftlog::appender", "ftlog-appender", LevelFilter::Debug)
        .appender("ftlog-appender", FileAppender::new(err_path))
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok((guard, log_path))
}
