pub mod binding;
pub mod builder;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod validation;

use std::sync::Arc;

use tokio::sync::watch;

use config::AppConfig;
use engine::provider::OpenAiProvider;
use engine::FieldGenerator;
use error::AppError;
use server::ServerState;

/// Load configuration, start logging and serve the generation endpoint
/// until Ctrl-C.
pub fn run() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    logging::init(&config.logging);

    tracing::info!("Starting form-builder v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;
    let addr = config.bind_addr()?;

    let provider = Arc::new(OpenAiProvider::new(&config.provider)?);
    let state = Arc::new(ServerState {
        generator: FieldGenerator::from_config(provider, &config.provider),
    });
    tracing::info!(
        model = %config.provider.model,
        max_tokens = config.provider.max_tokens,
        "Completion provider ready"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for Ctrl-C: {}", e);
                // Dropping the sender would stop the server.
                std::future::pending::<()>().await;
            }
            let _ = shutdown_tx.send(true);
        });

        server::start_server(addr, state, shutdown_rx).await
    })
}
