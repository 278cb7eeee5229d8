//! MPRIS D-Bus service so desktop media keys and `playerctl` can drive the
//! player.
//!
//! Method calls are forwarded as `ControlCmd`s to the event loop. The event
//! loop pushes playback status and metadata back through `MprisHandle`, which
//! wakes the service thread to emit `PropertiesChanged`.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::block_on;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::library::Track;
use crate::playback::PlayerState;

const BUS_NAME: &str = "org.mpris.MediaPlayer2.cadenza";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug)]
struct SharedState {
    playback: PlayerState,
    title: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            playback: PlayerState::Empty,
            title: None,
            url: None,
            length_micros: None,
            track_id: None,
        }
    }
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlayerState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    /// Publish the current track. `index` becomes the MPRIS track id.
    pub fn set_track_metadata(
        &self,
        index: Option<usize>,
        track: Option<&Track>,
        length: Option<Duration>,
    ) {
        if let Ok(mut s) = self.state.lock() {
            match track {
                Some(t) => {
                    s.title = Some(t.name.clone());
                    s.url = Some(format!("file://{}", t.path.display()));
                    s.length_micros = length.and_then(|d| i64::try_from(d.as_micros()).ok());
                    s.track_id = index.and_then(|i| {
                        ObjectPath::try_from(format!("/org/mpris/MediaPlayer2/track/{i}"))
                            .ok()
                            .map(OwnedObjectPath::from)
                    });
                }
                None => {
                    s.title = None;
                    s.url = None;
                    s.length_micros = None;
                    s.track_id = None;
                }
            }
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "cadenza"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn owned(v: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(v).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        s.playback.label()
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(id) = s.track_id.as_ref() {
            if let Some(v) = owned(Value::from(id.clone().into_inner())) {
                map.insert("mpris:trackid".to_string(), v);
            }
        }
        if let Some(v) = owned(Value::from(s.title.clone().unwrap_or_default())) {
            map.insert("xesam:title".to_string(), v);
        }
        if let Some(url) = s.url.clone() {
            if let Some(v) = owned(Value::from(url)) {
                map.insert("xesam:url".to_string(), v);
            }
        }
        if let Some(len) = s.length_micros {
            if let Some(v) = owned(Value::from(len)) {
                map.insert("mpris:length".to_string(), v);
            }
        }
        map
    }
}

async fn serve(
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
    notify: Receiver<()>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await?;

    let player = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;
    tracing::info!(name = BUS_NAME, "MPRIS service registered");

    // zbus dispatches calls on its own executor, so blocking here is fine.
    while notify.recv().is_ok() {
        while notify.try_recv().is_ok() {}
        let iface = player.get().await;
        let emitter = player.signal_emitter();
        iface.playback_status_changed(emitter).await?;
        iface.metadata_changed(emitter).await?;
    }
    Ok(())
}

/// Start the service on its own thread. Session-bus failures are logged and
/// leave the player running without MPRIS.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        if let Err(e) = block_on(serve(tx, state_for_thread, notify_rx)) {
            tracing::warn!(error = %e, "MPRIS unavailable");
        }
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}
