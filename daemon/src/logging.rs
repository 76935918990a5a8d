//! Logging setup: console plus optional daily-rotated file output.

use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter for `level` across the dragsense crates, unless `RUST_LOG` is set.
fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "dragsense={level},dragsense_core={level},dragsense_platform={level}"
        ))
    })
}

/// Daily-rotated log file in `dir`, written from a background thread so
/// events logged inside the pointer hook never wait on disk.
fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard), String> {
    std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("dragsense.log")
        .build(dir)
        .map_err(|e| e.to_string())?;
    Ok(tracing_appender::non_blocking(file_appender))
}

/// Initialize logging. Console output goes to stderr so stdout stays
/// clean for detection output.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the file writer.
pub fn setup(level: &str, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(filter(level));

    let file = log_dir.and_then(|dir| match file_writer(dir) {
        Ok(writer) => Some(writer),
        Err(e) => {
            eprintln!("Warning: Failed to open log directory {:?}: {}", dir, e);
            None
        }
    });

    match file {
        Some((writer, guard)) => {
            let file_layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter(level));
            let _ = tracing_subscriber::registry()
                .with(console_layer)
                .with(file_layer)
                .try_init();
            if let Some(dir) = log_dir {
                tracing::info!("File logging enabled: {:?}", dir);
            }
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry().with(console_layer).try_init();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_writer_flushes_on_guard_drop() {
        let dir = std::env::temp_dir().join(format!("dragsense-logs-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let (mut writer, guard) = file_writer(&dir).unwrap();
        writer.write_all(b"queued line\n").unwrap();
        drop(guard);

        let contents: String = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("dragsense.log"))
            .map(|entry| std::fs::read_to_string(entry.path()).unwrap())
            .collect();
        assert!(contents.contains("queued line"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
