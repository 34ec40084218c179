pub mod customers;

use axum::{routing::{get, post}, Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: customer API, health, docs, and the
/// static web interface as fallback (`index.html` for unknown paths).
pub fn build_router(state: ServerState, cors: CorsLayer, static_dir: &str) -> Router {
    // unknown paths get index.html so the browser interface can own routing
    let index = format!("{}/index.html", static_dir.trim_end_matches('/'));
    let static_files = ServeDir::new(static_dir).fallback(ServeFile::new(index));

    let api = Router::new()
        .route("/customers", get(customers::list_customers))
        .route("/customer", post(customers::create_customer))
        .route("/customer/:id", get(customers::get_customer));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        // API routes win; everything else falls through to the static directory
        .fallback_service(static_files)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
