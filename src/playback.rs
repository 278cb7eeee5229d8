//! The playlist/playback state machine.
//!
//! `PlaybackEngine` owns the queue and decides which track plays next under
//! shuffle and repeat. Decoding is delegated to an `AudioOutput`.

mod engine;
mod state;

pub use engine::PlaybackEngine;
pub use state::{PlaybackState, PlayerState};

#[cfg(test)]
mod tests;
