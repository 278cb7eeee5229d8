use std::path::Path;

use crate::error::{PlayerError, Result};

use super::model::Track;

/// The ordered queue of tracks currently loaded for playback.
#[derive(Debug, Default, Clone)]
pub struct TrackStore {
    tracks: Vec<Track>,
}

impl TrackStore {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Swap in a new queue, dropping the previous one.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }

    pub fn get(&self, index: usize) -> Result<&Track> {
        self.tracks.get(index).ok_or(PlayerError::OutOfRange {
            index,
            len: self.tracks.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Queue index of the track whose identity is `path`.
    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.tracks.iter().position(|t| t.path == path)
    }
}
