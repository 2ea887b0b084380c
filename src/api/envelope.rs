//! Response bodies and the API error type.
//!
//! Every error is rendered as `{ "message": "..." }`; mutations answer with
//! `{ "message": "...", "joke": { ... } }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use super::messages;
use crate::storage::StoreError;
use crate::types::Joke;

/// `{ "message": ... }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// `{ "message": ..., "joke": { ... } }`
#[derive(Debug, Serialize)]
pub struct JokeResponse {
    pub message: &'static str,
    pub joke: Joke,
}

impl JokeResponse {
    pub const fn new(message: &'static str, joke: Joke) -> Self {
        Self { message, joke }
    }
}

/// Errors surfaced to HTTP clients.
///
/// Storage I/O failures never reach this type; they are logged by the store.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(&'static str),
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn message(&self) -> &'static str {
        match self {
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::Conflict(msg) => *msg,
            Self::Internal(_) => messages::INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            error!("Request failed: {}", detail);
        }
        (self.status(), Json(MessageResponse::new(self.message()))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound(messages::JOKE_NOT_FOUND),
            StoreError::InvalidRecord(_) => Self::BadRequest(messages::INVALID_BODY),
            StoreError::IdsExhausted(_) => Self::Conflict(messages::IDS_EXHAUSTED),
            other => Self::Internal(other.to_string()),
        }
    }
}
