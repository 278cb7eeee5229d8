use std::fs::Metadata;
use std::path::PathBuf;
use std::time::SystemTime;

/// One audio file in the queue. Identity is `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    pub modified_at: SystemTime,
}

impl Track {
    /// Build a track from a path and the metadata obtained by stat-ing it.
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            name,
            size_bytes: metadata.len(),
            modified_at: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            path,
        }
    }
}
