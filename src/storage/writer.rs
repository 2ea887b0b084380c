//! Background writer for the backing file
//!
//! A single task owns all disk writes. Snapshots are queued on an unbounded
//! channel and written in the order they were enqueued, so the file always
//! ends up matching the most recent in-memory state.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use super::StoreError;

/// Commands accepted by the writer task.
#[derive(Debug)]
pub(crate) enum WriteCommand {
    /// Replace the backing file with `bytes`.
    Write {
        bytes: Vec<u8>,
        ack: oneshot::Sender<Result<(), StoreError>>,
    },
    /// Acknowledge once every earlier command has been processed.
    Flush(oneshot::Sender<()>),
}

/// Handle on a queued write.
///
/// Await it with [`PersistTicket::wait`] or drop it to fire and forget; the
/// write happens either way.
#[derive(Debug)]
pub struct PersistTicket(oneshot::Receiver<Result<(), StoreError>>);

impl PersistTicket {
    pub(crate) const fn new(rx: oneshot::Receiver<Result<(), StoreError>>) -> Self {
        Self(rx)
    }

    /// A ticket that has already resolved to `result`.
    pub(crate) fn resolved(result: Result<(), StoreError>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self(rx)
    }

    /// Wait for the write to hit the disk.
    pub async fn wait(self) -> Result<(), StoreError> {
        self.0.await.unwrap_or(Err(StoreError::WriterClosed))
    }
}

/// Spawn the writer task for `path` and return its command channel.
///
/// Must be called from within a Tokio runtime.
pub(crate) fn spawn(path: PathBuf) -> mpsc::UnboundedSender<WriteCommand> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run(path, rx));
    tx
}

async fn run(path: PathBuf, mut rx: mpsc::UnboundedReceiver<WriteCommand>) {
    debug!(path = %path.display(), "Backing file writer started");

    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Write { bytes, ack } => {
                let result = write_replace(&path, &bytes).await;
                match &result {
                    Ok(()) => debug!(path = %path.display(), bytes = bytes.len(), "Backing file written"),
                    Err(e) => error!("Error writing backing file: {}", e),
                }
                // Receiver may have been dropped (fire-and-forget caller).
                let _ = ack.send(result);
            }
            WriteCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    debug!(path = %path.display(), "Backing file writer stopped");
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
async fn write_replace(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = temp_path(path);

    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
