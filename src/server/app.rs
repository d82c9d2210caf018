use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::docs;
use super::handlers::{health, summary};
use crate::history::{HistoryStore, SqliteHistoryStore};
use crate::services::IngestService;

#[derive(Clone)]
pub struct AppState {
    pub ingest: IngestService,
}

/// Application backed by the SQLite history table
pub async fn create_app(db: DatabaseConnection, cors_origin: Option<&str>) -> Result<Router> {
    create_app_with_store(Arc::new(SqliteHistoryStore::new(db)), cors_origin)
}

pub fn create_app_with_store(
    store: Arc<dyn HistoryStore>,
    cors_origin: Option<&str>,
) -> Result<Router> {
    let state = AppState {
        ingest: IngestService::new(store),
    };

    let cors = match cors_origin {
        Some(origin) if origin != "*" => CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .nest("/api", api_routes())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/summary/", post(summary::upload_summary))
        .route("/summary", post(summary::upload_summary))
        .route("/summary/history", get(summary::list_history))
}
