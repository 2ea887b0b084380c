//! REST API module using Axum
//!
//! Provides the joke collection endpoints and a health check. Every JSON
//! error body carries a single `message` field from [`messages`].

pub mod envelope;
pub mod handlers;
pub mod messages;
mod routes;

pub use envelope::ApiError;
pub use handlers::ApiState;

use axum::http::{header, Method};
use axum::response::IntoResponse;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::defaults::ENV_CORS_ORIGINS;

/// JSON 404 for unmatched paths.
async fn route_not_found() -> impl IntoResponse {
    ApiError::NotFound(messages::ROUTE_NOT_FOUND)
}

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `JOKES_CORS_ORIGINS` to a comma-separated list of allowed origins.
fn build_cors_layer() -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
    ];

    match std::env::var(ENV_CORS_ORIGINS) {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(methods)
                .allow_headers([header::CONTENT_TYPE])
        }
        Err(_) => CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE]),
    }
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    Router::new()
        .merge(routes::joke_routes(state.clone()))
        .merge(routes::health_routes(state))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}
