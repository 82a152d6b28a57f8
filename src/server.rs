use axum::{
    extract::Request,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::Layer;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::catalog::Catalog;
use crate::db::SqliteRepository;
use crate::middleware::{NormalizePath, NormalizePathLayer};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SqliteRepository>,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(db: Arc<SqliteRepository>, catalog: Arc<Catalog>) -> Self {
        Self { db, catalog }
    }
}

/// The full service: router plus the URI rewrite, which must sit outside
/// the router because `Router::layer` middleware runs after routing.
pub fn build_app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer.layer(build_router(state))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/movies", get(crate::api::list_movies))
        .route(
            "/votes",
            get(crate::api::get_votes).post(crate::api::post_vote),
        )
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    // CORS preflight for unmatched paths; headers come from the CorsLayer.
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
