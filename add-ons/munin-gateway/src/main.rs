//! Axum-based gateway for the Munin meeting intelligence platform.
//!
//! Thin layer over the pipeline: accept an upload, persist the queued record,
//! schedule orchestration, and answer polls. All model backends are wired
//! here once at startup and injected down; no ambient singletons.

mod meetings;
mod search;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use munin_core::{MuninConfig, OllamaBridge, WhisperBridge};
use munin_core::traits::EmbeddingIndex;
use munin_index::QdrantIndex;
use munin_pipeline::{MediaNormalizer, Orchestrator, Scheduler, TokioScheduler};
use munin_store::MeetingStorage;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Shared handles for the request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: MuninConfig,
    pub storage: Arc<MeetingStorage>,
    pub index: Arc<dyn EmbeddingIndex>,
    pub scheduler: Arc<dyn Scheduler>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[munin-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MuninConfig::from_env();
    for dir in [&config.upload_dir, &config.processed_dir] {
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::error!("cannot create {}: {}", dir.display(), e);
            std::process::exit(1);
        }
    }

    let storage = match MeetingStorage::new(config.db_path.clone()) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("cannot open store at {}: {}", config.db_path.display(), e);
            std::process::exit(1);
        }
    };

    let transcriber = Arc::new(WhisperBridge::new(&config.whisper_server_url));
    let generator = Arc::new(OllamaBridge::new(&config.ollama_base_url, &config.ollama_model));
    let index: Arc<dyn EmbeddingIndex> = Arc::new(QdrantIndex::new(
        &config.qdrant_url,
        &config.ollama_base_url,
        &config.ollama_embed_model,
        &config.collection,
        config.chunk_words,
    ));

    let orchestrator = Arc::new(Orchestrator::new(
        transcriber,
        generator,
        index.clone(),
        storage.clone(),
        MediaNormalizer::new(&config.ffmpeg_bin),
        config.processed_dir.clone(),
    ));
    let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler::new(orchestrator));

    let state = AppState {
        config: config.clone(),
        storage,
        index,
        scheduler,
    };

    let app = build_app(state);
    let addr = config.bind_addr.clone();
    tracing::info!("munin-gateway listening on {}", addr);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("cannot bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
    }
}

fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/upload-meeting", post(meetings::upload_meeting_post))
        .route("/meetings", get(meetings::meetings_list_get))
        .route("/meetings/:meeting_id", get(meetings::meeting_detail_get))
        .route("/search", get(search::search_get))
        .route("/health", get(health_get))
        // Recordings are big; the axum default of 2 MiB would bounce them.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// GET /health — liveness probe.
async fn health_get() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "Munin meeting intelligence platform is running"
    }))
}
