use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize Sentry before anything else so panics during startup are captured.
    // Returns a no-op guard when SENTRY_DSN is absent (local dev).
    let _sentry_guard = sentry::init(sentry_options());

    match form_builder::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("form-builder exited with error: {}", e);
            eprintln!("form-builder: {e}");
            // Returning drops the Sentry guard, which flushes the event above.
            ExitCode::FAILURE
        }
    }
}

fn sentry_options() -> sentry::ClientOptions {
    sentry::ClientOptions {
        dsn: std::env::var("SENTRY_DSN").ok().and_then(|s| s.parse().ok()),
        release: Some(env!("CARGO_PKG_VERSION").into()),
        traces_sample_rate: 0.0,
        send_default_pii: false,
        before_send: Some(std::sync::Arc::new(|mut event| {
            // Interface definitions may contain customer schemas.
            if let Some(ref mut request) = event.request {
                request.data = None;
            }
            Some(event)
        })),
        ..Default::default()
    }
}
