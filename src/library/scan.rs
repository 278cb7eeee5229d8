use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::PlayerError;

use super::model::Track;

/// File extensions treated as audio (compared case-insensitively, without dot).
pub const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "wav", "ogg", "m4a", "flac", "aac"];

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Tracks found by a scan plus every entry that had to be skipped.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub tracks: Vec<Track>,
    /// Always `PlayerError::ScanIo`.
    pub issues: Vec<PlayerError>,
}

impl ScanReport {
    fn skip(&mut self, path: PathBuf, source: io::Error) {
        tracing::warn!(path = %path.display(), error = %source, "skipping unreadable entry");
        self.issues.push(PlayerError::ScanIo { path, source });
    }
}

/// What the user picked: explicit files or a folder to walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRequest {
    Files(Vec<PathBuf>),
    Folder(PathBuf),
}

impl ScanRequest {
    /// Interpret a single user-supplied path: directories are walked, anything
    /// else is taken as a file.
    pub fn from_path(path: PathBuf) -> Self {
        if path.is_dir() {
            Self::Folder(path)
        } else {
            Self::Files(vec![path])
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    pub fn run(&self, settings: &LibrarySettings) -> ScanReport {
        match self {
            Self::Files(paths) => list_files(paths),
            Self::Folder(root) => scan(root, settings),
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Stat each of `paths` and emit one track per regular file.
///
/// Entries that vanished or are not regular files are skipped and recorded in
/// the report; the rest of the batch is unaffected. No extension filter is
/// applied since the caller chose these files explicitly.
pub fn list_files(paths: &[PathBuf]) -> ScanReport {
    let mut report = ScanReport::default();

    for path in paths {
        let path = absolute(path);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {
                report.tracks.push(Track::from_metadata(path, &meta));
            }
            Ok(_) => report.skip(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ),
            Err(e) => report.skip(path, e),
        }
    }

    report
}

/// Recursively collect audio files below `root`, in the order the filesystem
/// enumerates them.
///
/// Errors on single entries or whole subtrees (permissions, broken links,
/// symlink loops) are recorded and the walk continues. When following links,
/// `walkdir` reports a loop instead of descending into it, and
/// `settings.max_depth` caps the depth in any case.
pub fn scan(root: &Path, settings: &LibrarySettings) -> ScanReport {
    let mut report = ScanReport::default();
    let root = absolute(root);

    let mut walker = WalkDir::new(&root).follow_links(settings.follow_links);
    if let Some(d) = settings.max_depth {
        walker = walker.max_depth(d);
    }

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.clone());
                report.skip(path, io::Error::from(err));
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_audio_file(entry.path()) {
            continue;
        }

        match entry.metadata() {
            Ok(meta) => report.tracks.push(Track::from_metadata(entry.into_path(), &meta)),
            Err(err) => report.skip(entry.path().to_path_buf(), io::Error::from(err)),
        }
    }

    tracing::debug!(
        root = %root.display(),
        tracks = report.tracks.len(),
        issues = report.issues.len(),
        "folder scan finished"
    );
    report
}
