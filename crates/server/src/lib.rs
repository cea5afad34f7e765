//! HTTP surface for the identity-document extraction pipeline.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use idscan_ocr::ExtractionPipeline;

/// Uploaded identity documents are single photos; 16 MiB covers any phone
/// camera output.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Shared application state: the pipeline and, through it, the process-wide
/// OCR / tagger / narrative singletons.
pub struct AppState {
    pub pipeline: ExtractionPipeline,
}

/// Build the application router.
pub fn create_server(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/upload", post(routes::upload))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
