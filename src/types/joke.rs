//! Joke record
//!
//! A joke is an open record: `id`, `jokeText` and `jokeType` are always
//! present, anything else a client sends is carried along in `extra` and
//! written back out verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier assigned by the store on creation.
///
/// Signed: backing files written by other tools may carry zero or negative ids.
pub type JokeId = i64;

/// A single joke as stored in the backing file and served over HTTP.
///
/// Serializes as `id`, `jokeText`, `jokeType`, followed by any extra fields
/// in the order they were first seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joke {
    pub id: JokeId,
    #[serde(rename = "jokeText")]
    pub joke_text: String,
    #[serde(rename = "jokeType")]
    pub joke_type: String,
    /// Fields outside the fixed schema, preserved through updates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Joke {
    /// Build a new joke from a submitted body, forcing `id`.
    ///
    /// Any `id` in the body is overwritten.
    pub fn from_submission(id: JokeId, mut body: Map<String, Value>) -> serde_json::Result<Self> {
        body.insert("id".to_string(), Value::from(id));
        serde_json::from_value(Value::Object(body))
    }

    /// Shallow merge: every key present in `patch` replaces the current
    /// value, keys absent from `patch` are left untouched.
    ///
    /// Fails when the merged record no longer fits the fixed fields, e.g. a
    /// numeric `jokeText` or a string `id`.
    pub fn merged(&self, patch: &Map<String, Value>) -> serde_json::Result<Self> {
        let mut fields = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(fields))
    }
}
