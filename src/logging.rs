use anyhow::{Context, Result};
use flexi_logger::{Age, Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::Path;

const LOG_FILE_BASENAME: &str = "perch";

/// Rotation keeps one file per day, seven days back
const LOG_FILES_KEPT: usize = 7;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

/// Initialize file logging into `log_dir` exactly once per process.
/// Subsequent calls are no-ops so the CLI subcommands can share the setup
/// path with the widget host.
pub fn init(level: &str, log_dir: &Path) -> Result<()> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let handle = Logger::try_with_str(level)
        .with_context(|| format!("Invalid log level: {level}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(LOG_FILES_KEPT),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("Failed to start logger")?;

    let _ = LOGGER.set(handle);
    info!(
        "logging started: level={} dir={} version={}",
        level,
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

/// Flush buffered records and stop the logger. Runs as the final step of the
/// shutdown sequence, after the hook is gone and the document is saved.
pub fn shutdown() {
    if let Some(handle) = LOGGER.get() {
        handle.flush();
        handle.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();

        init("info", dir.path()).unwrap();
        // Second call must be a quiet no-op
        init("debug", dir.path()).unwrap();
    }
}
