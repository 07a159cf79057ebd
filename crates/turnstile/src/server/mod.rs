mod rpc;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use turnstile_core::esplora::EsploraApi;
use turnstile_core::indexer::IndexerClient;
use turnstile_core::node::NodeRpcClient;

/// Maximum accepted request body size. Bulk transaction batches can be far
/// larger than axum's 2 MB default.
const BODY_LIMIT: usize = 64 * 1024 * 1024;

// ==============================================================================
// Application State
// ==============================================================================

pub struct AppState {
    pub node: Arc<NodeRpcClient>,
    pub indexer: Arc<IndexerClient>,
    pub esplora: Arc<dyn EsploraApi>,
}

type SharedState = Arc<AppState>;

// ==============================================================================
// Router
// ==============================================================================

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/", post(rpc::handle))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .with_state(Arc::new(state))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
