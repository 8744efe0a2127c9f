use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use chairside::application::services::{PersistenceService, TranscriptionService};
use chairside::infrastructure::audio::WhisperEngine;
use chairside::infrastructure::auth::DeviceCodeBroker;
use chairside::infrastructure::graph::GraphDriveClient;
use chairside::infrastructure::observability::{init_tracing, TracingConfig};
use chairside::infrastructure::storage::LocalFallbackStore;
use chairside::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    init_tracing(TracingConfig::default(), settings.server.port);

    let engine = WhisperEngine::new(settings.whisper.model)
        .map_err(|e| anyhow::anyhow!("Whisper engine failed to load: {}", e))?;
    let transcription = Arc::new(TranscriptionService::new(engine));

    let broker = Arc::new(DeviceCodeBroker::new(
        &settings.identity.tenant_id,
        &settings.identity.client_id,
        settings.identity.token_cache_path.clone(),
    ));
    let remote = Arc::new(GraphDriveClient::new(
        broker,
        settings.onedrive.folder.clone(),
    ));
    let fallback = Arc::new(LocalFallbackStore::new(
        settings.onedrive.fallback_dir.clone(),
    ));
    let persistence = Arc::new(PersistenceService::new(remote, fallback));

    let router = create_router(AppState {
        transcription,
        persistence,
    });

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
