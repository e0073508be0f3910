//! Route definitions for the TenantHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(public_routes())
        .merge(webhook_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Public prospect submission.
fn public_routes() -> Router<AppState> {
    Router::new().route(
        "/access-requests",
        post(handlers::access_requests::submit),
    )
}

/// Signed payment processor callbacks.
fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhooks/payment", post(handlers::webhooks::payment))
}

/// Admin surface; identity arrives via trusted headers.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/access-requests",
            get(handlers::access_requests::list),
        )
        .route(
            "/admin/access-requests/count",
            get(handlers::access_requests::count),
        )
        .route(
            "/admin/access-requests/stats",
            get(handlers::access_requests::stats),
        )
        .route(
            "/admin/access-requests/{id}",
            get(handlers::access_requests::get),
        )
        .route(
            "/admin/access-requests/{id}/approve",
            post(handlers::access_requests::approve),
        )
        .route(
            "/admin/access-requests/{id}/reject",
            post(handlers::access_requests::reject),
        )
        .route("/admin/tenants", get(handlers::tenants::list))
        .route("/admin/tenants/{id}", get(handlers::tenants::get))
        .route("/admin/tenants/{id}", patch(handlers::tenants::update))
        .route(
            "/admin/tenants/{id}/resend-credentials",
            post(handlers::tenants::resend_credentials),
        )
        .route("/admin/api-keys", get(handlers::api_keys::list))
        .route("/admin/api-keys", post(handlers::api_keys::create))
        .route("/admin/api-keys/{id}", patch(handlers::api_keys::toggle))
        .route("/admin/audit", get(handlers::audit::search))
}

/// Liveness probe.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Build the CORS layer from configured origins; an empty list allows
/// any origin (development default).
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
