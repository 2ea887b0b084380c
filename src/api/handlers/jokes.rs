//! Joke collection endpoints
//!
//! Mutating handlers queue the disk write and answer without waiting for it.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::ApiState;
use crate::api::envelope::{ApiError, JokeResponse, MessageResponse};
use crate::api::messages;
use crate::types::{Joke, JokeId};

// ============================================================================
// Request helpers
// ============================================================================

/// Query string for `GET /jokes`.
#[derive(Debug, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type", default)]
    pub joke_type: Option<String>,
}

/// Parse the `:id` path segment from its leading integer, so `12abc` and
/// `1.5` address 12 and 1. A segment with no leading digits cannot match a joke.
fn parse_id(raw: &str) -> Result<JokeId, ApiError> {
    let raw = raw.trim_start();
    let sign = usize::from(raw.starts_with(['+', '-']));
    let digits = raw[sign..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(raw.len(), |end| sign + end);
    raw[..digits]
        .parse()
        .map_err(|_| ApiError::NotFound(messages::JOKE_NOT_FOUND))
}

/// Parse a request body as a JSON object. An empty body is an empty object.
fn parse_body(bytes: &Bytes) -> Result<Map<String, Value>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    serde_json::from_slice(bytes).map_err(|_| ApiError::BadRequest(messages::INVALID_BODY))
}

/// Present and a non-empty string.
fn has_text(body: &Map<String, Value>, key: &str) -> bool {
    matches!(body.get(key), Some(Value::String(s)) if !s.is_empty())
}

// ============================================================================
// Reads
// ============================================================================

/// GET /jokes/random - One joke picked uniformly at random
pub async fn get_random_joke(State(state): State<ApiState>) -> Result<Json<Joke>, ApiError> {
    state
        .store
        .random()
        .await
        .map(Json)
        .ok_or(ApiError::NotFound(messages::NO_JOKES_AVAILABLE))
}

/// GET /jokes/:id
pub async fn get_joke(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Joke>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .get(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound(messages::JOKE_NOT_FOUND))
}

/// GET /jokes?type=T - All jokes of type `T`, possibly none
///
/// A missing or empty `type` is rejected.
pub async fn list_jokes_by_type(
    State(state): State<ApiState>,
    query: Result<Query<TypeQuery>, QueryRejection>,
) -> Result<Json<Vec<Joke>>, ApiError> {
    let joke_type = query
        .ok()
        .and_then(|Query(q)| q.joke_type)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::BadRequest(messages::FILTER_MISSING))?;

    Ok(Json(state.store.by_type(&joke_type).await))
}

// ============================================================================
// Mutations
// ============================================================================

/// POST /jokes - Create a joke; `jokeText` and `jokeType` are required
pub async fn create_joke(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<(StatusCode, Json<JokeResponse>), ApiError> {
    let body = parse_body(&body).map_err(|_| ApiError::BadRequest(messages::CREATE_REJECTED))?;
    if !has_text(&body, "jokeText") || !has_text(&body, "jokeType") {
        return Err(ApiError::BadRequest(messages::CREATE_REJECTED));
    }

    let created = state.store.create(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(JokeResponse::new(messages::JOKE_CREATED, created.record)),
    ))
}

/// PUT /jokes/:id - Merge the body over the stored joke
pub async fn replace_joke(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<JokeResponse>, ApiError> {
    apply_update(&state, &id, &body).await
}

/// PATCH /jokes/:id - Same merge as PUT
pub async fn patch_joke(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<JokeResponse>, ApiError> {
    apply_update(&state, &id, &body).await
}

async fn apply_update(
    state: &ApiState,
    raw_id: &str,
    body: &Bytes,
) -> Result<Json<JokeResponse>, ApiError> {
    let id = parse_id(raw_id)?;
    let patch = parse_body(body)?;
    let updated = state.store.update(id, &patch).await?;
    Ok(Json(JokeResponse::new(messages::JOKE_UPDATED, updated.record)))
}

/// DELETE /jokes/:id - Remove one joke and return it
pub async fn delete_joke(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<JokeResponse>, ApiError> {
    let id = parse_id(&id)?;
    let removed = state.store.remove(id).await?;
    Ok(Json(JokeResponse::new(messages::JOKE_DELETED, removed.record)))
}

/// DELETE /jokes - Empty the collection
///
/// The backing file is only rewritten when `persist_on_clear` is enabled.
pub async fn delete_all_jokes(State(state): State<ApiState>) -> Json<MessageResponse> {
    let cleared = state.store.clear().await;
    debug!(removed = cleared.record, "Bulk delete");
    Json(MessageResponse::new(messages::ALL_JOKES_DELETED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert_eq!(parse_id("-1").unwrap(), -1);
        assert_eq!(parse_id(" +7").unwrap(), 7);
        assert_eq!(parse_id("12abc").unwrap(), 12);
        assert_eq!(parse_id("1.5").unwrap(), 1);
        for raw in ["abc", "", "-", "x12", "99999999999999999999"] {
            assert!(matches!(parse_id(raw), Err(ApiError::NotFound(_))), "{raw:?}");
        }
    }

    #[test]
    fn test_parse_body() {
        assert!(parse_body(&Bytes::new()).unwrap().is_empty());
        assert!(parse_body(&Bytes::from_static(b" \n")).unwrap().is_empty());
        assert_eq!(
            parse_body(&Bytes::from_static(br#"{"a":1}"#)).unwrap().len(),
            1
        );
        assert!(parse_body(&Bytes::from_static(b"[1,2]")).is_err());
        assert!(parse_body(&Bytes::from_static(b"{oops")).is_err());
    }

    #[test]
    fn test_has_text() {
        let body: Map<String, Value> =
            serde_json::from_str(r#"{"a":"x","b":"","c":5,"d":null}"#).unwrap();
        assert!(has_text(&body, "a"));
        assert!(!has_text(&body, "b"));
        assert!(!has_text(&body, "c"));
        assert!(!has_text(&body, "d"));
        assert!(!has_text(&body, "missing"));
    }
}
