//! In-memory joke collection mirrored to a JSON file
//!
//! Reads never touch the disk. Every mutation updates the collection and,
//! while still holding the write lock, queues a full snapshot on the
//! background writer. Holding the lock while queueing keeps the writer's
//! queue in the same order as the mutations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::seq::SliceRandom;
use serde_json::{Map, Value};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, error, info, warn};

use super::writer::{self, PersistTicket, WriteCommand};
use super::StoreError;
use crate::types::{Joke, JokeId};

/// Options for opening a [`JokeStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Backing JSON file.
    pub path: PathBuf,
    /// Persist the empty collection after a bulk delete.
    ///
    /// Off by default: a bulk delete only clears memory and a restart
    /// brings the previous file contents back.
    pub persist_on_clear: bool,
}

impl StoreOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            persist_on_clear: false,
        }
    }
}

/// Result of a mutation: the affected record and its pending disk write.
#[derive(Debug)]
pub struct Mutation<T> {
    pub record: T,
    pub write: PersistTicket,
}

/// The joke collection and its backing file.
#[derive(Debug)]
pub struct JokeStore {
    jokes: RwLock<Vec<Joke>>,
    path: PathBuf,
    persist_on_clear: bool,
    writer: mpsc::UnboundedSender<WriteCommand>,
}

/// One more than the largest id in `jokes`, or 1 when empty.
///
/// `None` once the largest id is `JokeId::MAX`.
pub fn next_id(jokes: &[Joke]) -> Option<JokeId> {
    jokes
        .iter()
        .map(|j| j.id)
        .max()
        .map_or(Some(1), |max| max.checked_add(1))
}

impl JokeStore {
    /// Load the backing file and start the writer task.
    ///
    /// A missing, unreadable or malformed file yields an empty collection.
    pub async fn open(options: StoreOptions) -> Arc<Self> {
        let store = Self {
            jokes: RwLock::new(Vec::new()),
            writer: writer::spawn(options.path.clone()),
            path: options.path,
            persist_on_clear: options.persist_on_clear,
        };
        let count = store.load().await;
        info!(path = %store.path.display(), jokes = count, "Joke store opened");
        Arc::new(store)
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file and replace the collection.
    ///
    /// On a read or parse failure the current collection is kept and the
    /// failure is logged. Returns the number of jokes held afterwards.
    pub async fn load(&self) -> usize {
        match read_collection(&self.path).await {
            Ok(loaded) => {
                let mut jokes = self.jokes.write().await;
                *jokes = loaded;
                jokes.len()
            }
            Err(e @ (StoreError::Parse { .. } | StoreError::InvalidRow { .. })) => {
                warn!("Ignoring malformed backing file: {}", e);
                self.len().await
            }
            Err(e) => {
                error!("Error reading backing file: {}", e);
                self.len().await
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.jokes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jokes.read().await.is_empty()
    }

    /// Copy of the whole collection in order.
    pub async fn snapshot(&self) -> Vec<Joke> {
        self.jokes.read().await.clone()
    }

    /// Id the next created joke will receive, `None` when ids are exhausted.
    pub async fn next_id(&self) -> Option<JokeId> {
        next_id(&self.jokes.read().await)
    }

    /// Uniformly random joke, `None` when the collection is empty.
    pub async fn random(&self) -> Option<Joke> {
        let jokes = self.jokes.read().await;
        jokes.choose(&mut rand::thread_rng()).cloned()
    }

    /// First joke with `id`.
    pub async fn get(&self, id: JokeId) -> Option<Joke> {
        self.jokes.read().await.iter().find(|j| j.id == id).cloned()
    }

    /// All jokes whose `jokeType` equals `joke_type`, in collection order.
    pub async fn by_type(&self, joke_type: &str) -> Vec<Joke> {
        self.jokes
            .read()
            .await
            .iter()
            .filter(|j| j.joke_type == joke_type)
            .cloned()
            .collect()
    }

    /// Append a joke built from `body` under a freshly assigned id.
    pub async fn create(&self, body: Map<String, Value>) -> Result<Mutation<Joke>, StoreError> {
        let mut jokes = self.jokes.write().await;
        let id = next_id(&jokes).ok_or(StoreError::IdsExhausted(JokeId::MAX))?;
        let joke = Joke::from_submission(id, body).map_err(StoreError::InvalidRecord)?;
        jokes.push(joke.clone());
        debug!(id = joke.id, "Joke created");

        let write = self.enqueue(&jokes);
        Ok(Mutation { record: joke, write })
    }

    /// Shallow-merge `patch` over the joke with `id`.
    ///
    /// A supplied `id` in the patch is accepted as-is, even if another joke
    /// already uses it.
    pub async fn update(
        &self,
        id: JokeId,
        patch: &Map<String, Value>,
    ) -> Result<Mutation<Joke>, StoreError> {
        let mut jokes = self.jokes.write().await;
        let slot = jokes
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let updated = slot.merged(patch).map_err(StoreError::InvalidRecord)?;
        *slot = updated.clone();
        debug!(id, new_id = updated.id, "Joke updated");

        let write = self.enqueue(&jokes);
        Ok(Mutation {
            record: updated,
            write,
        })
    }

    /// Remove the joke with `id`, keeping the order of the rest.
    pub async fn remove(&self, id: JokeId) -> Result<Mutation<Joke>, StoreError> {
        let mut jokes = self.jokes.write().await;
        let index = jokes
            .iter()
            .position(|j| j.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let removed = jokes.remove(index);
        debug!(id, "Joke deleted");

        let write = self.enqueue(&jokes);
        Ok(Mutation {
            record: removed,
            write,
        })
    }

    /// Empty the collection.
    ///
    /// Only queues a write when `persist_on_clear` is set. Returns the
    /// number of jokes removed.
    pub async fn clear(&self) -> Mutation<usize> {
        let mut jokes = self.jokes.write().await;
        let removed = jokes.len();
        jokes.clear();

        if self.persist_on_clear {
            debug!(removed, "All jokes deleted, persisting");
            Mutation {
                record: removed,
                write: self.enqueue(&jokes),
            }
        } else {
            debug!(removed, "All jokes deleted in memory only");
            Mutation {
                record: removed,
                write: PersistTicket::resolved(Ok(())),
            }
        }
    }

    /// Queue a write of the current collection without changing it.
    pub async fn persist(&self) -> PersistTicket {
        let jokes = self.jokes.read().await;
        self.enqueue(&jokes)
    }

    /// Wait until every write queued so far has finished.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.writer.send(WriteCommand::Flush(tx)).is_err() {
            warn!("Backing file writer already stopped, nothing to flush");
            return;
        }
        let _ = rx.await;
    }

    fn enqueue(&self, jokes: &[Joke]) -> PersistTicket {
        let bytes = match serde_json::to_vec_pretty(jokes) {
            Ok(b) => b,
            Err(e) => {
                error!("Error serializing jokes: {}", e);
                return PersistTicket::resolved(Err(StoreError::Serialization(e)));
            }
        };

        let (ack, rx) = oneshot::channel();
        if self.writer.send(WriteCommand::Write { bytes, ack }).is_err() {
            error!("Backing file writer is not running, write dropped");
        }
        // A failed send drops `ack`, which resolves the ticket to WriterClosed.
        PersistTicket::new(rx)
    }
}

/// Read and parse the backing file.
///
/// A missing or blank file is an empty collection. When the file is an
/// array but one record does not fit, the error names that record.
async fn read_collection(path: &Path) -> Result<Vec<Joke>, StoreError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "Backing file not found, starting empty");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&contents).map_err(|source| {
        first_invalid_row(&contents).map_or_else(
            || StoreError::Parse {
                path: path.to_path_buf(),
                source,
            },
            |(index, source)| StoreError::InvalidRow {
                path: path.to_path_buf(),
                index,
                source,
            },
        )
    })
}

/// Index and error of the first array element that is not a joke.
fn first_invalid_row(contents: &str) -> Option<(usize, serde_json::Error)> {
    let rows: Vec<Value> = serde_json::from_str(contents).ok()?;
    rows.into_iter()
        .enumerate()
        .find_map(|(index, row)| serde_json::from_value::<Joke>(row).err().map(|e| (index, e)))
}
