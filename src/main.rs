//! Research Hub Backend
//!
//! REST backend for the citation manager, file manager and Aethon research assistant,
//! with SQLite persistence, Tantivy full-text search and local-disk file storage.

mod api;
mod assistant;
mod auth;
mod citations;
mod config;
mod db;
mod errors;
mod models;
mod search;
mod storage;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assistant::Assistant;
use config::Config;
use db::Repository;
use search::SearchIndex;
use storage::{ObjectStore, STORAGE_ROUTE};

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub search: Arc<SearchIndex>,
    pub storage: Arc<ObjectStore>,
    pub assistant: Arc<Assistant>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Research Hub Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Index path: {:?}", config.index_path);
    tracing::info!("Storage path: {:?}", config.storage_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (HUB_API_PSK). Authentication is disabled!");
    }
    if config.assistant.api_url.is_none() {
        tracing::info!("No assistant endpoint configured, using canned replies");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Initialize search index
    let search = Arc::new(SearchIndex::open(&config.index_path)?);

    // Build initial search index from database
    tracing::info!("Building search index...");
    let citations = repo.list_all_citations().await?;
    search.rebuild(&citations).await?;

    let storage = Arc::new(ObjectStore::open(
        &config.storage_path,
        &config.public_base_url,
    )?);
    let assistant = Arc::new(Assistant::new(config.assistant.clone())?);

    // Create application state
    let state = AppState {
        repo,
        search,
        storage,
        assistant,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Citations
        .route("/citations", get(api::list_citations))
        .route("/citations", post(api::create_citation))
        .route("/citations/summary", get(api::citation_summary))
        .route("/citations/search", get(api::search_citations))
        .route("/citations/export", get(api::export_citations))
        .route("/citations/{id}", get(api::get_citation))
        .route("/citations/{id}", put(api::update_citation))
        .route("/citations/{id}", delete(api::delete_citation))
        .route("/citations/{id}/favorite", post(api::toggle_favorite))
        .route("/citations/{id}/format", post(api::regenerate_formats))
        .route("/citations/{id}/formatted", get(api::format_citation))
        // Files
        .route("/files", get(api::list_files))
        .route(
            "/files",
            post(api::upload_file).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/files/{id}", get(api::get_file))
        .route("/files/{id}", delete(api::delete_file))
        .route("/files/{id}/analyze", post(api::analyze_file))
        // Assistant
        .route("/chat", post(api::chat))
        .route("/assistant/outline", post(api::generate_outline))
        .route("/assistant/questions", post(api::research_questions))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check and stored objects (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .nest_service(STORAGE_ROUTE, ServeDir::new(state.storage.root()));

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    service: &'static str,
    database: &'static str,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let database = match state.repo.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            "unavailable"
        }
    };

    Json(HealthStatus {
        status: if database == "connected" { "ok" } else { "degraded" },
        service: "research-hub-backend",
        database,
    })
}

#[cfg(test)]
mod tests;
