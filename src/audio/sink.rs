//! Utilities for creating `rodio` sinks from file paths.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
///
/// Returns the sink and the length the decoder reports, if any.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), String> {
    let file = File::open(path).map_err(|e| format!("failed to open: {e}"))?;
    let source =
        Decoder::new(BufReader::new(file)).map_err(|e| format!("failed to decode: {e}"))?;
    let total = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(source.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}

/// Read the track length from container metadata.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    let tagged = lofty::read_from_path(path).ok()?;
    let duration = tagged.properties().duration();
    (!duration.is_zero()).then_some(duration)
}
