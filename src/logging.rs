use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogConfig;

/// Keeps the non-blocking file writer alive for the process lifetime.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize tracing with stdout, optional rolling file and Sentry layers.
///
/// - Stdout: compact, human-readable for the dev console
/// - File: daily rolling `form-builder.log` under `log_dir`, when configured
/// - Sentry: captures ERROR events as issues, WARN as breadcrumbs
/// - Default level: INFO, override via RUST_LOG env
pub fn init(config: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,form_builder=debug"));

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .compact();

    let file_layer = config.log_dir.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "form-builder.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        FILE_GUARD.set(guard).ok();
        fmt::layer().with_ansi(false).with_writer(writer)
    });

    // No-op when Sentry DSN is not configured.
    let sentry_layer = sentry_tracing::layer().event_filter(|meta| match *meta.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    });

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .with(sentry_layer)
        .try_init();

    if result.is_err() {
        // A subscriber is already installed (tests, embedding hosts).
        return;
    }

    tracing::debug!("Tracing initialized");
}
