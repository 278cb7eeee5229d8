//! Music library: the track model, folder scanning and the in-memory queue.
//!
//! `scan` and `list_files` turn user selections into `Track`s; `TrackStore`
//! holds the ordered queue the playback engine works on.

mod display;
mod model;
mod scan;
mod store;

pub use display::{format_file_size, format_time};
pub use model::Track;
pub use scan::{AUDIO_EXTENSIONS, ScanReport, ScanRequest, is_audio_file, list_files, scan};
pub use store::TrackStore;

#[cfg(test)]
mod tests;
