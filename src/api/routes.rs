//! API route definitions
//!
//! - /jokes         - filter by type, create, delete all
//! - /jokes/random  - random pick
//! - /jokes/:id     - read, merge update (PUT/PATCH), delete
//! - /health        - liveness

use axum::routing::{delete, get, patch, post, put};
use axum::Router;

use super::handlers::{self, ApiState};

/// Joke collection routes
pub fn joke_routes(state: ApiState) -> Router {
    Router::new()
        .route("/jokes", get(handlers::list_jokes_by_type))
        .route("/jokes", post(handlers::create_joke))
        .route("/jokes", delete(handlers::delete_all_jokes))
        // Static segment, matched before the :id capture
        .route("/jokes/random", get(handlers::get_random_joke))
        .route("/jokes/:id", get(handlers::get_joke))
        .route("/jokes/:id", put(handlers::replace_joke))
        .route("/jokes/:id", patch(handlers::patch_joke))
        .route("/jokes/:id", delete(handlers::delete_joke))
        .with_state(state)
}

/// Health endpoint at root level
pub fn health_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
