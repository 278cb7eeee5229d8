use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::{AudioEvent, AudioEventKind, AudioOutput, RequestId};
use crate::error::{PlayerError, Result};
use crate::library::{Track, TrackStore};

use super::state::{PlaybackState, PlayerState};

/// Owns the queue and the transport state, and drives an `AudioOutput`.
///
/// Every `load` is tagged with a fresh `RequestId`; events from the output
/// that carry an older id are dropped in [`PlaybackEngine::handle_event`].
pub struct PlaybackEngine {
    store: TrackStore,
    output: Box<dyn AudioOutput>,
    state: PlaybackState,
    volume: f32,
    request: RequestId,
    /// Queue index of the source the output currently holds.
    loaded: Option<usize>,
    duration: Option<Duration>,
    position: Duration,
    rng: StdRng,
}

impl PlaybackEngine {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self::with_rng(output, StdRng::from_entropy())
    }

    /// Engine with a deterministic shuffle sequence.
    pub fn with_seed(output: Box<dyn AudioOutput>, seed: u64) -> Self {
        Self::with_rng(output, StdRng::seed_from_u64(seed))
    }

    fn with_rng(output: Box<dyn AudioOutput>, rng: StdRng) -> Self {
        Self {
            store: TrackStore::default(),
            output,
            state: PlaybackState::default(),
            volume: 1.0,
            request: RequestId::default(),
            loaded: None,
            duration: None,
            position: Duration::ZERO,
            rng,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn player_state(&self) -> PlayerState {
        if self.store.is_empty() {
            PlayerState::Empty
        } else if self.state.is_playing {
            PlayerState::Playing
        } else {
            PlayerState::Paused
        }
    }

    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    pub fn current_track(&self) -> Option<&Track> {
        if self.store.is_empty() {
            return None;
        }
        self.store.get(self.state.current_index).ok()
    }

    pub fn volume_percent(&self) -> u8 {
        (self.volume * 100.0).round() as u8
    }

    /// Length of the loaded source, once the output has reported it.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    /// Id of the most recent `load`; events carrying any other id are stale.
    pub fn request(&self) -> RequestId {
        self.request
    }

    /// Replace the queue and park on its first track, paused.
    ///
    /// Shuffle and repeat flags carry over. An empty `tracks` leaves the
    /// engine in `PlayerState::Empty`.
    pub fn replace_queue(&mut self, tracks: Vec<Track>) -> Result<()> {
        self.pause();
        self.store.replace(tracks);
        self.state.current_index = 0;
        self.state.is_playing = false;
        self.forget_source();

        tracing::debug!(tracks = self.store.len(), "queue replaced");
        if self.store.is_empty() {
            // Nothing new gets loaded; retire the old source's events anyway.
            self.request = self.request.next();
            return Ok(());
        }
        self.load_current()
    }

    /// Start or resume the current track.
    pub fn play(&mut self) -> Result<()> {
        if self.store.is_empty() {
            return Err(PlayerError::EmptyQueue);
        }
        if self.loaded != Some(self.state.current_index) {
            self.load_current()?;
        }
        self.start()
    }

    pub fn pause(&mut self) {
        if !self.state.is_playing {
            return;
        }
        self.state.is_playing = false;
        if let Err(e) = self.output.pause() {
            tracing::warn!(error = %e, "pause request failed");
        }
    }

    pub fn toggle(&mut self) -> Result<()> {
        if self.state.is_playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Pause and rewind the current track.
    pub fn stop(&mut self) {
        if self.store.is_empty() {
            return;
        }
        self.pause();
        self.rewind();
    }

    /// Jump to `index` and play it from the start.
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        let len = self.store.len();
        if index >= len {
            return Err(PlayerError::OutOfRange { index, len });
        }
        self.state.current_index = index;
        self.load_and_play()
    }

    /// Step back one track, wrapping to the end. Shuffle does not apply.
    pub fn previous(&mut self) -> Result<()> {
        let len = self.store.len();
        if len == 0 {
            return Err(PlayerError::EmptyQueue);
        }
        self.state.current_index = (self.state.current_index + len - 1) % len;
        self.load_and_play()
    }

    /// Advance to the following track, or a uniformly random one when
    /// shuffled (the current track may be picked again).
    pub fn next(&mut self) -> Result<()> {
        let len = self.store.len();
        if len == 0 {
            return Err(PlayerError::EmptyQueue);
        }
        self.state.current_index = if self.state.is_shuffled {
            self.rng.gen_range(0..len)
        } else {
            (self.state.current_index + 1) % len
        };
        self.load_and_play()
    }

    /// Repeat restarts the same track; otherwise behaves like `next`.
    pub fn on_track_ended(&mut self) -> Result<()> {
        if self.store.is_empty() {
            return Err(PlayerError::EmptyQueue);
        }
        if self.state.is_repeated {
            self.rewind();
            return self.play();
        }
        self.next()
    }

    /// Returns the new flag.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.state.is_shuffled = !self.state.is_shuffled;
        self.state.is_shuffled
    }

    /// Returns the new flag.
    pub fn toggle_repeat(&mut self) -> bool {
        self.state.is_repeated = !self.state.is_repeated;
        self.state.is_repeated
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.state.is_shuffled = on;
    }

    pub fn set_repeat(&mut self, on: bool) {
        self.state.is_repeated = on;
    }

    /// Set the volume from a percentage; anything above 100 is clamped.
    pub fn set_volume(&mut self, percent: u8) {
        self.volume = f32::from(percent.min(100)) / 100.0;
        if let Err(e) = self.output.set_volume(self.volume) {
            tracing::warn!(error = %e, "volume request failed");
        }
    }

    /// Seek to `fraction` of the current track's length.
    ///
    /// Does nothing until the output has reported a length for the loaded
    /// source, or when `fraction` is NaN or infinite.
    pub fn seek(&mut self, fraction: f64) {
        if !fraction.is_finite() || self.loaded != Some(self.state.current_index) {
            return;
        }
        let Some(duration) = self.duration else {
            return;
        };
        self.seek_to(duration.mul_f64(fraction.clamp(0.0, 1.0)));
    }

    /// Move the playhead by `delta` seconds, clamped to the track.
    pub fn scrub(&mut self, delta: i64) {
        let Some(duration) = self.duration else {
            return;
        };
        if duration.is_zero() {
            return;
        }
        let target = self.position.as_secs_f64() + delta as f64;
        self.seek(target / duration.as_secs_f64());
    }

    /// Apply one event from the audio output.
    ///
    /// Events for a superseded source are ignored. An `Error` reverts to
    /// paused (keeping the index) and is returned as `PlaybackFailed`.
    pub fn handle_event(&mut self, event: AudioEvent) -> Result<()> {
        if event.request != self.request {
            tracing::trace!(
                request = event.request.get(),
                current = self.request.get(),
                "dropping stale audio event"
            );
            return Ok(());
        }

        match event.kind {
            AudioEventKind::Loaded(duration) => {
                self.duration = duration;
                Ok(())
            }
            AudioEventKind::TimeUpdate(position) => {
                self.position = position;
                Ok(())
            }
            AudioEventKind::Ended => {
                if let Some(d) = self.duration {
                    self.position = d;
                }
                self.on_track_ended()
            }
            AudioEventKind::Error(reason) => {
                self.state.is_playing = false;
                let path = self
                    .loaded
                    .and_then(|i| self.store.get(i).ok())
                    .map(|t| t.path.clone())
                    .unwrap_or_default();
                self.forget_source();
                tracing::warn!(path = %path.display(), %reason, "audio output reported an error");
                Err(PlayerError::PlaybackFailed { path, reason })
            }
        }
    }

    /// Stop the output for good.
    pub fn shutdown(&mut self) {
        self.output.shutdown();
    }

    fn forget_source(&mut self) {
        self.loaded = None;
        self.duration = None;
        self.position = Duration::ZERO;
    }

    fn load_current(&mut self) -> Result<()> {
        let index = self.state.current_index;
        let path = self.store.get(index)?.path.clone();

        self.request = self.request.next();
        self.forget_source();
        tracing::debug!(
            index,
            request = self.request.get(),
            path = %path.display(),
            "loading track"
        );

        match self.output.load(self.request, &path) {
            Ok(()) => {
                self.loaded = Some(index);
                Ok(())
            }
            Err(e) => {
                self.state.is_playing = false;
                Err(PlayerError::PlaybackFailed {
                    path,
                    reason: e.to_string(),
                })
            }
        }
    }

    fn load_and_play(&mut self) -> Result<()> {
        self.load_current()?;
        self.start()
    }

    /// Ask the output to play the loaded source, optimistically marking the
    /// engine as playing.
    fn start(&mut self) -> Result<()> {
        self.state.is_playing = true;
        if let Err(e) = self.output.play(self.request) {
            self.state.is_playing = false;
            let path = self
                .current_track()
                .map(|t| t.path.clone())
                .unwrap_or_default();
            return Err(PlayerError::PlaybackFailed {
                path,
                reason: e.to_string(),
            });
        }
        Ok(())
    }

    fn rewind(&mut self) {
        if self.loaded.is_none() {
            return;
        }
        self.seek_to(Duration::ZERO);
    }

    fn seek_to(&mut self, position: Duration) {
        match self.output.seek(position) {
            Ok(()) => self.position = position,
            Err(e) => tracing::warn!(error = %e, "seek request failed"),
        }
    }
}
