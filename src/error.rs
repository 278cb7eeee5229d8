//! Error taxonomy shared by the scanner, the playback engine and favorites
//! persistence.
//!
//! Leaf I/O failures are converted into one of these kinds at the component
//! boundary. None of them is fatal: the runtime turns every error into a
//! notice and keeps going.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// A transport operation was attempted with no tracks loaded.
    #[error("queue is empty")]
    EmptyQueue,

    /// Index outside `[0, len)`.
    #[error("index {index} out of range for queue of {len} track(s)")]
    OutOfRange { index: usize, len: usize },

    /// The audio output could not load or start a track.
    #[error("failed to play {}: {reason}", path.display())]
    PlaybackFailed { path: PathBuf, reason: String },

    /// A file or subtree could not be read while building the queue.
    #[error("failed to read {}: {source}", path.display())]
    ScanIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The favorites could not be read from or written to durable storage.
    #[error("failed to persist `{key}`: {source}")]
    PersistenceIo {
        key: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PlayerError>;
