use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelhouse_core::{
    create_download_client, create_notifier, create_year_lookup, load_config, validate_config,
    DirectoryMatcher, DownloadClient, DownloadWatcher, FsPlacer, MetadataLookup, Notifier,
    ReleaseProcessor, SanitizedConfig, TitleYearExtractor,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

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
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("reelhouse {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("REELHOUSE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    match serde_json::to_string(&SanitizedConfig::from(&config)) {
        Ok(json) => info!("Effective configuration: {}", json),
        Err(e) => warn!("Failed to render configuration: {}", e),
    }

    let client_config = config
        .download_client
        .as_ref()
        .context("[download_client] section is required")?;

    // Metadata lookup (disabled without a [metadata] section)
    let lookup = create_year_lookup(config.metadata.as_ref())
        .context("Failed to create metadata lookup")?;
    info!("Using metadata provider: {}", lookup.name());

    let notifier: Arc<dyn Notifier> =
        Arc::from(create_notifier(&config.notifier).context("Failed to create notifier")?);
    info!("Using notifier: {}", notifier.name());

    let processor = ReleaseProcessor::new(
        &config.library,
        DirectoryMatcher::new(&config.matcher),
        TitleYearExtractor::new(lookup),
        Arc::new(FsPlacer::new(config.placer.clone())),
        notifier,
    );
    processor
        .prepare()
        .await
        .context("Failed to prepare staging directory")?;
    info!(
        "Library: {:?} (staging in {:?})",
        config.library.destination_root, config.library.staging_dir
    );

    let client: Arc<dyn DownloadClient> = Arc::from(
        create_download_client(client_config).context("Failed to create download client")?,
    );
    info!("Using download client: {}", client.name());

    let watcher = DownloadWatcher::new(client, Arc::new(processor), config.watcher.clone());

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    watcher
        .run(shutdown_rx)
        .await
        .context("Download watcher stopped")?;

    info!("Shutdown complete");
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
