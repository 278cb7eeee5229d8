//! Elapsed-time bookkeeping for the current source.
//!
//! Sinks do not report their position, so the output thread keeps a clock
//! that runs while playing and holds its value while paused.

use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone)]
pub(super) struct PlaybackClock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl PlaybackClock {
    pub(super) fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub(super) fn pause(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    /// Jump to `at`, keeping the running/paused state.
    pub(super) fn reset(&mut self, at: Duration) {
        let running = self.is_running();
        self.accumulated = at;
        self.started_at = running.then(Instant::now);
    }

    pub(super) fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub(super) fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }
}
