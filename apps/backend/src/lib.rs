pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::store::{MemoryStore, StudyStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudyStore>,
}

/// Build the application router over a store.
pub fn router(store: Arc<dyn StudyStore>) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/health", get(health_check))
        // Practice routes
        .route("/api/practice/start", post(routes::practice::start))
        // Session routes
        .route("/api/sessions", get(routes::sessions::list))
        .route("/api/sessions/{id}", get(routes::sessions::get))
        .route("/api/sessions/{id}/answer", post(routes::sessions::answer))
        .route("/api/sessions/{id}/navigate", post(routes::sessions::navigate))
        .route("/api/sessions/{id}/submit", post(routes::sessions::submit))
        // Review routes
        .route("/api/review/queue", get(routes::review::queue))
        .route("/api/review/stats", get(routes::review::stats))
        .route("/api/review/analytics", get(routes::review::analytics))
        .route(
            "/api/review/recommendations",
            get(routes::review::recommendations),
        )
        .route("/api/review/{item_id}", post(routes::review::record))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load the question bank
    let store = match std::env::var("QUESTION_BANK") {
        Ok(path) => {
            tracing::info!("Loading question bank from {}", path);
            let raw = std::fs::read_to_string(&path)?;
            let questions: Vec<learning_core::Question> = serde_json::from_str(&raw)?;
            tracing::info!("Loaded {} questions", questions.len());
            MemoryStore::with_questions(questions)
        }
        Err(_) => {
            tracing::warn!("QUESTION_BANK not set, starting with an empty bank");
            MemoryStore::new()
        }
    };

    let app = router(Arc::new(store));

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
