//! Projection of the queue for display: everything, or favorites only.
//!
//! Neither function touches the queue. Rows map back to queue indices by
//! track path, never by row position.

use crate::favorites::FavoritesSet;
use crate::library::{Track, TrackStore};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    AllSongs,
    FavoritesOnly,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::AllSongs => ViewMode::FavoritesOnly,
            ViewMode::FavoritesOnly => ViewMode::AllSongs,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::AllSongs => "All songs",
            ViewMode::FavoritesOnly => "Favorites",
        }
    }
}

/// Tracks to show under `mode`, in queue order.
pub fn visible<'a>(
    store: &'a TrackStore,
    favorites: &FavoritesSet,
    mode: ViewMode,
) -> Vec<&'a Track> {
    match mode {
        ViewMode::AllSongs => store.tracks().iter().collect(),
        ViewMode::FavoritesOnly => store
            .tracks()
            .iter()
            .filter(|t| favorites.contains(&t.path))
            .collect(),
    }
}

/// Queue index of a displayed track.
pub fn queue_index_of(store: &TrackStore, track: &Track) -> Option<usize> {
    store.position_of(&track.path)
}
