use std::sync::Arc;

use storereel_api::routes::build_router;
use storereel_api::state::AppState;
use storereel_api::telemetry;
use storereel_core::Config;
use storereel_db::{MemoryVideoStore, PgVideoStore, VideoStore};
use storereel_ingest::{PipelineConfig, UploadPipeline};
use storereel_platform::{Auth, HttpAssetPlatform, HttpTransferer, PlatformClient};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = Config::from_env()?;
    config.validate()?;

    let store: Arc<dyn VideoStore> = match &config.database_url {
        Some(url) => Arc::new(PgVideoStore::connect(url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            Arc::new(MemoryVideoStore::new())
        }
    };

    let auth = config.asset_api_key.clone().map(Auth::XApiKey);
    let client = PlatformClient::new(config.asset_api_url.clone(), auth)?;
    let transferer = Arc::new(HttpTransferer::new(client.client().clone()));
    let platform = Arc::new(HttpAssetPlatform::new(client));

    let pipeline = Arc::new(UploadPipeline::new(
        platform,
        transferer,
        store.clone(),
        PipelineConfig::from(&config),
    ));

    let state = Arc::new(AppState {
        store,
        pipeline,
        config: config.clone(),
    });
    let router = build_router(state, &config);

    let addr = format!("0.0.0.0:{}", config.server_port);
    tracing::info!(
        addr = %addr,
        asset_api_url = %config.asset_api_url,
        max_upload_mb = config.max_upload_bytes / 1024 / 1024,
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Listens for Ctrl+C (SIGINT) and SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
