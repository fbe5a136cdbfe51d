use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,budget_alerts=debug"))
}

/// Tracing to stdout, used by the REST server.
/// Default level: INFO, override via RUST_LOG.
pub fn init_stdout() {
    let stdout_layer = fmt::layer().with_target(true).compact();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(stdout_layer)
        .init();

    tracing::debug!("Tracing initialized (stdout)");
}

/// Tracing to a file, used while the terminal UI owns the screen.
/// The returned guard must live until shutdown or buffered lines are lost.
pub fn init_file(path: &Path) -> WorkerGuard {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| crate::config::DEFAULT_LOG_FILE.into());

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .init();

    tracing::debug!(path = %path.display(), "Tracing initialized (file)");
    guard
}
