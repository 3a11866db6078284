//! mfcc-ui - MFCC extraction upload service
//!
//! Serves a single-page web UI: pick a WAV/MP3/FLAC file, upload it, and
//! see its 13-coefficient MFCC matrix as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use mfcc_ui::api::buildinfo::BuildInfo;
use mfcc_ui::cli::Args;
use mfcc_ui::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing exists so the configured level can apply
    let config = args.load_config()?;
    mfcc_common::logging::init_tracing(&config.logging.level)?;

    let build = BuildInfo::current();
    info!(
        "Starting MFCC Lab upload UI (mfcc-ui) v{} [{}] built {} ({})",
        build.version, build.git_hash, build.build_timestamp, build.build_profile
    );
    args.config_source().log();
    info!("Max upload size: {} bytes", config.max_upload_bytes);

    let state = AppState::with_mfcc_extractor(config.max_upload_bytes);
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mfcc-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
