use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediacat_core::{
    load_config, validate_config, Config, MediaCatalog, ScanError, ScanPipeline,
    SqliteMediaCatalog, TagMetadataReader,
};
use mediacat_server::{api::create_router, cli::Cli, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    match &cli.config {
        Some(path) => info!("Loading configuration from {:?}", path),
        None => info!("No config file given, using defaults and environment"),
    }
    let mut config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    cli.apply(&mut config);

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Database path: {:?}", config.database.path);
    info!("Music directory: {:?}", config.library.music_dir);

    // Open the catalog once; every component shares this handle
    let catalog: Arc<dyn MediaCatalog> = Arc::new(
        SqliteMediaCatalog::new(&config.database.path).context("Failed to open catalog")?,
    );
    info!("Catalog initialized");

    if cli.scan {
        run_scan(&config, catalog).await
    } else {
        serve(config, catalog).await
    }
}

/// Index the music directory, then return.
async fn run_scan(config: &Config, catalog: Arc<dyn MediaCatalog>) -> Result<()> {
    let cancel = CancellationToken::new();

    // Ctrl+C / SIGTERM stop the walk
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        warn!("Shutdown requested, cancelling scan");
        signal_token.cancel();
    });

    let library = config.library.clone();
    let root = library.music_dir.clone();
    let pipeline = ScanPipeline::from_config(catalog, TagMetadataReader::new(), &library);

    let result = tokio::task::spawn_blocking(move || pipeline.scan(&root, &cancel))
        .await
        .context("Scan task panicked")?;

    match result {
        Ok(report) => {
            info!(
                root = %report.root.display(),
                indexed = report.records_indexed,
                unique = report.unique_records(),
                no_metadata = report.skipped_no_metadata,
                errors = report.skipped_errors,
                pruned = report.pruned,
                "Scan complete"
            );
            Ok(())
        }
        Err(ScanError::Cancelled { records_indexed }) => {
            warn!("Scan cancelled after indexing {} records", records_indexed);
            Ok(())
        }
        Err(e) => Err(e).context("Scan failed"),
    }
}

/// Serve the query API and static files until a shutdown signal arrives.
async fn serve(config: Config, catalog: Arc<dyn MediaCatalog>) -> Result<()> {
    let addr = SocketAddr::new(config.server.host, config.server.port);

    // Create app state
    let state = Arc::new(AppState::new(config, catalog));

    // Create router
    let app = create_router(state);

    // Start server
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
