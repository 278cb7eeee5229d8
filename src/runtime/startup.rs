use std::path::PathBuf;

use crate::app::{App, NoticeLevel};
use crate::config;
use crate::favorites::{FavoritesStore, JsonFileStore, MemoryStore};
use crate::library::ScanRequest;

pub const WELCOME: &str = "Welcome to cadenza! Press o to open music files or a folder.";

/// Favorites backed by the configured storage file, or kept in memory only
/// when no data directory can be determined.
pub fn favorites_store(settings: &config::Settings) -> FavoritesStore {
    match settings.storage_path() {
        Some(path) => {
            tracing::debug!(path = %path.display(), "favorites storage");
            FavoritesStore::new(Box::new(JsonFileStore::new(path)))
        }
        None => {
            tracing::warn!("no data directory; favorites will not persist");
            FavoritesStore::new(Box::new(MemoryStore::default()))
        }
    }
}

pub fn apply_playback_defaults(app: &mut App, settings: &config::Settings) {
    app.follow_playback = settings.ui.follow_playback;
    app.engine.set_shuffle(settings.playback.shuffle);
    app.engine.set_repeat(settings.playback.repeat);
    app.engine.set_volume(settings.audio.initial_volume);
}

/// Interpret positional arguments: a single directory is scanned, anything
/// else is taken as a list of files.
pub fn initial_request(args: Vec<PathBuf>) -> Option<ScanRequest> {
    match args.len() {
        0 => None,
        1 => args.into_iter().next().map(ScanRequest::from_path),
        _ => Some(ScanRequest::Files(args)),
    }
}

pub fn greet(app: &mut App) {
    app.notify(NoticeLevel::Info, WELCOME);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_no_scan() {
        assert_eq!(initial_request(Vec::new()), None);
    }

    #[test]
    fn single_directory_is_scanned_as_folder() {
        let dir = tempfile::tempdir().unwrap();
        let req = initial_request(vec![dir.path().to_path_buf()]).unwrap();
        assert_eq!(req, ScanRequest::Folder(dir.path().to_path_buf()));
    }

    #[test]
    fn several_paths_are_files() {
        let args = vec![PathBuf::from("a.mp3"), PathBuf::from("b.mp3")];
        assert_eq!(
            initial_request(args.clone()),
            Some(ScanRequest::Files(args))
        );
    }
}
