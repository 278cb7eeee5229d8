use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use super::types::RequestId;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio thread is not running")]
    Disconnected,
}

/// Requests the playback engine makes of the audio subsystem.
///
/// Calls only enqueue work; results arrive later as `AudioEvent`s. An `Err`
/// here means the request could not even be submitted.
pub trait AudioOutput {
    /// Replace the current source with `path`, paused at position 0.
    fn load(&mut self, request: RequestId, path: &Path) -> Result<(), AudioError>;

    /// Start or resume the source loaded under `request`. Implementations
    /// ignore a `request` that has since been superseded by another `load`.
    fn play(&mut self, request: RequestId) -> Result<(), AudioError>;

    fn pause(&mut self) -> Result<(), AudioError>;

    /// Jump to an absolute position in the current source.
    fn seek(&mut self, position: Duration) -> Result<(), AudioError>;

    /// Linear volume in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32) -> Result<(), AudioError>;

    /// Stop all output before the process exits.
    fn shutdown(&mut self) {}
}
