use std::sync::Arc;

use mail_host::{build_router, AppState};
use mail_tools::{AssistantConfig, FileTokenStore, TokenStore};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LOG_DIRECTIVES: &str = "info,mail_host=debug,mail_tools=debug";

/// Stdout logging, plus a plain-text file under `LOG_DIR` when set.
fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));

    let (file_layer, guard) = match std::env::var("LOG_DIR") {
        Ok(log_dir) => {
            let file_appender = tracing_appender::rolling::never(log_dir, "mail-host.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the real environment may carry everything.
    dotenvy::dotenv().ok();
    let _guard = init_tracing();

    let config = match AssistantConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let tokens = Arc::new(FileTokenStore::new(config.token_file.clone()));
    match tokens.load().await {
        Some(record) => info!(
            "Found stored token record at {} (access token present: {})",
            tokens.path().display(),
            record.access_token().is_some()
        ),
        None => info!("No stored token record at {}", tokens.path().display()),
    }

    let bind_addr = config.bind_addr.clone();
    let app = build_router(AppState::new(config, tokens))?;

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Gmail AI Assistant listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete.");
    Ok(())
}
