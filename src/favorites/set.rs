use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Paths of favorite tracks.
///
/// Independent of any queue: paths that are not currently loaded (or no
/// longer exist) are kept and simply never match a track.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FavoritesSet {
    paths: BTreeSet<PathBuf>,
}

impl FavoritesSet {
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Add `path` if absent, remove it otherwise. Returns `true` when added.
    pub fn toggle(&mut self, path: &Path) -> bool {
        if self.paths.remove(path) {
            false
        } else {
            self.paths.insert(path.to_path_buf())
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FromIterator<PathBuf> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}
