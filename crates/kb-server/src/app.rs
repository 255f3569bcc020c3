//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// Every GET request goes through [`handlers::serve`], which strips the mount
/// path and dispatches to pages, assets or search.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::serve))
        .route("/{*path}", get(handlers::serve))
        .layer(CompressionLayer::new());

    for layer in security::header_layers() {
        router = router.layer(layer);
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
