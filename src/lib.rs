//! joke-api: a joke collection over HTTP
//!
//! Jokes live in memory and are mirrored to a flat JSON file.
//!
//! ## Architecture
//!
//! - **Store**: ordered in-memory collection plus a background writer that
//!   rewrites the backing file after each mutation
//! - **API**: axum handlers for read, create, merge update and delete

pub mod api;
pub mod config;
pub mod storage;
pub mod types;

pub use api::{create_app, ApiState};
pub use config::ServerConfig;
pub use storage::{JokeStore, StoreError, StoreOptions};
pub use types::{Joke, JokeId};
