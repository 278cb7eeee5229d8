//! Audio-related small types.
//!
//! This module defines the request ids, events and thread commands shared
//! by the output implementation and the playback engine.

use std::path::PathBuf;
use std::time::Duration;

/// Identifies one `load` request. Strictly increasing; events carrying an
/// older id belong to a superseded source.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioEventKind {
    /// The source is decodable. `None` when its length cannot be determined.
    Loaded(Option<Duration>),
    /// Periodic position report while playing.
    TimeUpdate(Duration),
    /// Playback reached the end of the source.
    Ended,
    /// The source could not be loaded or started.
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioEvent {
    pub request: RequestId,
    pub kind: AudioEventKind,
}

impl AudioEvent {
    pub fn new(request: RequestId, kind: AudioEventKind) -> Self {
        Self { request, kind }
    }
}

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Replace the current source with the file at `path`, paused at 0.
    Load { request: RequestId, path: PathBuf },
    /// Start or resume the source loaded by `request`.
    Play(RequestId),
    /// Pause whatever is playing.
    Pause,
    /// Move to an absolute position in the current source.
    Seek(Duration),
    /// Linear volume, `0.0..=1.0`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}
