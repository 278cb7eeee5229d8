use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::AudioSettings;

use super::clock::PlaybackClock;
use super::sink::{create_sink_at, probe_duration};
use super::types::{AudioCmd, AudioEvent, AudioEventKind, RequestId};

/// The source most recently loaded. `sink` is `None` when decoding failed.
struct Current {
    request: RequestId,
    path: PathBuf,
    sink: Option<Sink>,
}

fn emit(events: &Sender<AudioEvent>, request: RequestId, kind: AudioEventKind) {
    // The receiver only goes away during shutdown.
    let _ = events.send(AudioEvent::new(request, kind));
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64, volume: f32) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(volume * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<AudioEvent>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream: Option<OutputStream> = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which
                // would scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "no audio output device; every track will fail to load"
                );
                None
            }
        };

        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        let mut current: Option<Current> = None;
        let mut paused = true;
        let mut volume: f32 = 1.0;
        let mut clock = PlaybackClock::default();

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { request, path } => {
                        if let Some(old) = current.take() {
                            if let Some(s) = old.sink {
                                s.stop();
                            }
                        }
                        paused = true;
                        clock.pause();
                        clock.reset(Duration::ZERO);

                        let Some(stream) = stream.as_ref() else {
                            emit(
                                &events,
                                request,
                                AudioEventKind::Error("no audio output device".to_string()),
                            );
                            current = Some(Current {
                                request,
                                path,
                                sink: None,
                            });
                            continue;
                        };

                        let sink = match create_sink_at(stream, &path, Duration::ZERO) {
                            Ok((sink, decoded_len)) => {
                                sink.set_volume(volume);
                                let duration = probe_duration(&path).or(decoded_len);
                                emit(&events, request, AudioEventKind::Loaded(duration));
                                Some(sink)
                            }
                            Err(reason) => {
                                tracing::warn!(path = %path.display(), %reason, "load failed");
                                emit(&events, request, AudioEventKind::Error(reason));
                                None
                            }
                        };
                        current = Some(Current {
                            request,
                            path,
                            sink,
                        });
                    }

                    AudioCmd::Play(request) => {
                        let Some(cur) = current.as_mut() else {
                            emit(
                                &events,
                                request,
                                AudioEventKind::Error("nothing loaded".to_string()),
                            );
                            continue;
                        };
                        if cur.request != request {
                            tracing::trace!(
                                request = request.get(),
                                current = cur.request.get(),
                                "ignoring play for superseded source"
                            );
                            continue;
                        }

                        // A finished sink is empty; rebuild it from the start.
                        if cur.sink.as_ref().is_some_and(Sink::empty) {
                            if let Some(stream) = stream.as_ref() {
                                cur.sink = create_sink_at(stream, &cur.path, Duration::ZERO)
                                    .ok()
                                    .map(|(s, _)| s);
                                clock.reset(Duration::ZERO);
                            }
                        }

                        match cur.sink.as_ref() {
                            Some(s) => {
                                s.set_volume(volume);
                                s.play();
                                paused = false;
                                clock.start();
                            }
                            None => emit(
                                &events,
                                request,
                                AudioEventKind::Error("source could not be decoded".to_string()),
                            ),
                        }
                    }

                    AudioCmd::Pause => {
                        if let Some(s) = current.as_ref().and_then(|c| c.sink.as_ref()) {
                            s.pause();
                        }
                        paused = true;
                        clock.pause();
                    }

                    AudioCmd::Seek(position) => {
                        // Rebuild the current sink and skip into the file.
                        let (Some(cur), Some(stream)) = (current.as_mut(), stream.as_ref()) else {
                            continue;
                        };
                        if let Some(s) = cur.sink.take() {
                            s.stop();
                        }

                        match create_sink_at(stream, &cur.path, position) {
                            Ok((sink, _)) => {
                                sink.set_volume(volume);
                                if !paused {
                                    sink.play();
                                }
                                cur.sink = Some(sink);
                                clock.reset(position);
                                emit(&events, cur.request, AudioEventKind::TimeUpdate(position));
                            }
                            Err(reason) => {
                                paused = true;
                                clock.pause();
                                emit(&events, cur.request, AudioEventKind::Error(reason));
                            }
                        }
                    }

                    AudioCmd::SetVolume(v) => {
                        volume = v.clamp(0.0, 1.0);
                        if let Some(s) = current.as_ref().and_then(|c| c.sink.as_ref()) {
                            s.set_volume(volume);
                        }
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(s) = current.as_ref().and_then(|c| c.sink.as_ref()) {
                            if !paused {
                                fade_out_sink(s, fade_out_ms, volume);
                            }
                            s.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic end-of-track check and position report.
                    if paused {
                        continue;
                    }
                    let Some(cur) = current.as_ref() else {
                        continue;
                    };
                    let Some(s) = cur.sink.as_ref() else {
                        continue;
                    };

                    if s.empty() {
                        paused = true;
                        clock.pause();
                        emit(&events, cur.request, AudioEventKind::Ended);
                    } else {
                        emit(&events, cur.request, AudioEventKind::TimeUpdate(clock.elapsed()));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
