//! Route table for the gateway's HTTP surface

use std::sync::Arc;

use axum::routing::{any, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::AppState;

/// Build the full router, nested under the `/api` prefix.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/services", get(handlers::services))
        .route("/proxy/:service", any(handlers::proxy_root))
        .route("/proxy/:service/*path", any(handlers::proxy_tail))
        .route("/ml", any(handlers::ml))
        .route("/ml/*path", any(handlers::ml))
        .route("/app", any(handlers::app))
        .route("/app/*path", any(handlers::app))
        .route("/auth/register", post(handlers::auth_register))
        .route("/auth/login", post(handlers::auth_login))
        .route("/auth/profile", get(handlers::auth_profile))
        .route("/auth/check", get(handlers::auth_check))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
