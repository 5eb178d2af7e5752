//! Durable storage for the book collection
//!
//! The entire collection lives in a single key-value slot: a JSON file
//! named after [`STORAGE_KEY`] inside the data directory. Every flush
//! rewrites the whole slot; loading happens once at startup. Observers
//! can subscribe to be notified after each successful write.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use thiserror::Error;
use tracing::debug;

use super::model::Book;

/// Fixed name of the storage slot. Shelves written by earlier versions
/// live under this key and must keep loading.
pub const STORAGE_KEY: &str = "BOOKSHELF_APPS";

/// Notification emitted after every successful flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveEvent {
    /// Number of books in the collection that was written.
    pub books: usize,
}

/// Errors from the storage layer.
///
/// Malformed slot data is reported as an error here; the shelf decides
/// the recovery policy (start empty rather than crash).
#[derive(Debug, Error)]
pub enum StorageError {
    /// The slot directory cannot be created or written.
    #[error("storage unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the slot file failed for a reason other than absence.
    #[error("failed to read slot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the slot file failed.
    #[error("failed to write slot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The slot holds data that does not deserialize into a collection.
    #[error("slot {path} holds malformed data: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The collection could not be serialized.
    #[error("failed to serialize the collection: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// The one key-value slot the collection is mirrored to.
#[derive(Debug)]
pub struct StorageSlot {
    dir: PathBuf,
    listeners: Vec<Sender<SaveEvent>>,
}

impl StorageSlot {
    /// A slot inside the given directory. Nothing is touched on disk
    /// until the first load or flush.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), listeners: Vec::new() }
    }

    /// Capability probe: can the slot directory be used at all? When this
    /// is false the session runs memory-only instead of crashing.
    pub fn is_available(&self) -> bool {
        fs::create_dir_all(&self.dir).is_ok()
    }

    /// Path of the slot file, named after the fixed storage key.
    pub fn slot_path(&self) -> PathBuf {
        self.dir.join(format!("{STORAGE_KEY}.json"))
    }

    /// Subscribe to save notifications. Every successful flush delivers
    /// one [`SaveEvent`] to each live subscriber; dropped receivers are
    /// pruned on the next flush.
    pub fn subscribe(&mut self) -> Receiver<SaveEvent> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    /// Read the whole collection out of the slot.
    ///
    /// An absent or empty slot is an empty collection, not an error.
    /// Malformed contents are reported as [`StorageError::Malformed`].
    pub fn load(&self) -> Result<Vec<Book>, StorageError> {
        let path = self.slot_path();

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StorageError::Read { path, source }),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|source| StorageError::Malformed { path, source })
    }

    /// Serialize the entire collection and overwrite the slot, then
    /// notify subscribers that data was saved.
    pub fn flush(&mut self, books: &[Book]) -> Result<(), StorageError> {
        let path = self.slot_path();

        ensure_dir(&self.dir)?;

        let contents = serde_json::to_string_pretty(books).map_err(StorageError::Serialize)?;
        fs::write(&path, contents)
            .map_err(|source| StorageError::Write { path: path.clone(), source })?;

        debug!(books = books.len(), slot = %path.display(), "collection flushed");
        self.notify_saved(books.len());
        Ok(())
    }

    fn notify_saved(&mut self, books: usize) {
        let event = SaveEvent { books };
        self.listeners.retain(|tx| tx.send(event).is_ok());
    }
}

fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir)
        .map_err(|source| StorageError::Unavailable { path: dir.to_path_buf(), source })
}
