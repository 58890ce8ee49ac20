//! genbooth - image generation relay backend

use anyhow::Result;
use clap::Parser;
use tracing::info;

use genbooth::config::{Args, Config};
use genbooth::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting genbooth v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = Config::from_args(Args::parse());
    info!("Data directory: {}", config.data_dir.display());
    info!("Generation backend: {}", config.backend_address);

    let port = config.port;
    let state = AppState::new(config)?;
    let app = build_router(state);

    let addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("genbooth listening on http://{addr}");
    info!("Health check: http://{addr}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
