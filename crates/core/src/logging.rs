use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber.
///
/// Output goes to a daily-rolling file named after `component` inside
/// `log_dir`. `RUST_LOG` overrides `default_filter`. Stdout is never used
/// because it carries protocol traffic.
pub fn init_logging(
    component: &str,
    log_dir: &Path,
    default_filter: &str,
    to_stderr: bool,
) -> WorkerGuard {
    let _ = std::fs::create_dir_all(log_dir);

    // Files like lsp.log.2026-01-21
    let file_appender = tracing_appender::rolling::daily(log_dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).init();
    } else {
        registry.init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    // Installs the process-wide subscriber, so this is the only test that may
    // call `init_logging`.
    #[test]
    fn writes_to_a_rolling_file_in_the_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let guard = init_logging("test", &log_dir, "info", false);
        tracing::info!("hello from the test");
        drop(guard);

        let files: Vec<_> = std::fs::read_dir(&log_dir).unwrap().flatten().collect();
        assert_eq!(files.len(), 1);
        let name = files[0].file_name();
        assert!(name.to_string_lossy().starts_with("test."));
        let contents = std::fs::read_to_string(files[0].path()).unwrap();
        assert!(contents.contains("hello from the test"));
    }
}
