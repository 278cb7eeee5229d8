//! Audio output: the collaborator the playback engine drives.
//!
//! `AudioOutput` is the narrow interface the engine calls into; events flow
//! back as `AudioEvent`s tagged with the `RequestId` of the source they belong
//! to. `RodioOutput` is the real implementation, decoding on its own thread.

mod clock;
mod output;
mod player;
mod sink;
mod thread;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use output::{AudioError, AudioOutput};
pub use player::RodioOutput;
pub use types::{AudioEvent, AudioEventKind, RequestId};
