use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;

use super::output::{AudioError, AudioOutput};
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioEvent, RequestId};

/// `AudioOutput` backed by rodio on a dedicated thread.
///
/// Commands are queued to the thread; its events come back on the receiver
/// returned from [`RodioOutput::new`].
pub struct RodioOutput {
    tx: Sender<AudioCmd>,
    join: Option<JoinHandle<()>>,
    fade_out: Duration,
}

impl RodioOutput {
    pub fn new(audio_settings: AudioSettings) -> (Self, Receiver<AudioEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<AudioEvent>();
        let fade_out = Duration::from_millis(audio_settings.quit_fade_out_ms);

        let audio_handle = spawn_audio_thread(rx, event_tx, audio_settings);

        (
            Self {
                tx,
                join: Some(audio_handle),
                fade_out,
            },
            event_rx,
        )
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), AudioError> {
        self.tx.send(cmd).map_err(|_| AudioError::Disconnected)
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, request: RequestId, path: &Path) -> Result<(), AudioError> {
        self.send(AudioCmd::Load {
            request,
            path: path.to_path_buf(),
        })
    }

    fn play(&mut self, request: RequestId) -> Result<(), AudioError> {
        self.send(AudioCmd::Play(request))
    }

    fn pause(&mut self) -> Result<(), AudioError> {
        self.send(AudioCmd::Pause)
    }

    fn seek(&mut self, position: Duration) -> Result<(), AudioError> {
        self.send(AudioCmd::Seek(position))
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), AudioError> {
        self.send(AudioCmd::SetVolume(volume))
    }

    fn shutdown(&mut self) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: self.fade_out.as_millis() as u64,
        });

        if let Some(h) = self.join.take() {
            if h.join().is_err() {
                tracing::error!("audio thread panicked");
            }
        }
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        self.shutdown();
    }
}
