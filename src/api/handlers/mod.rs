//! API route handlers
//!
//! - Joke reads: random, by id, by type
//! - Joke mutations: create, merge update, delete one, delete all
//! - Health check

mod health;
mod jokes;

pub use health::*;
pub use jokes::*;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::storage::JokeStore;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Joke collection and its backing file
    pub store: Arc<JokeStore>,
    /// Process start, for the health endpoint
    pub started_at: DateTime<Utc>,
}

impl ApiState {
    pub fn new(store: Arc<JokeStore>) -> Self {
        Self {
            store,
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        u64::try_from((Utc::now() - self.started_at).num_seconds()).unwrap_or(0)
    }
}
