//! Route registration — collects module routes + system endpoints.

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;

/// Build the complete router with all routes.
pub fn build_router(module_routes: Vec<(String, Router)>) -> Router {
    // System endpoints (public, no state needed).
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    // Mount each module's routes at the root; modules already namespace
    // themselves (the WMS module serves under /wms/v1).
    for (name, router) in module_routes {
        tracing::debug!(module = %name, "mounting module routes");
        app = app.merge(router);
    }

    app
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "openwmsd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
