//! Application model: the `App` that ties the engine, favorites and view
//! together for the UI, the runtime and MPRIS.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::audio::{AudioEvent, AudioEventKind, RequestId};
use crate::error::PlayerError;
use crate::favorites::{FavoritesSet, FavoritesStore};
use crate::library::{ScanReport, ScanRequest, Track};
use crate::playback::{PlaybackEngine, PlayerState};
use crate::view::{self, ViewMode};

use super::notice::{NoticeLevel, Notices};

pub const STATUS_READY: &str = "Ready";

/// The main application model.
pub struct App {
    pub engine: PlaybackEngine,
    pub favorites: FavoritesSet,
    favorites_store: FavoritesStore,

    pub view_mode: ViewMode,
    /// Row in the visible list under the cursor.
    pub selected: usize,
    pub follow_playback: bool,

    pub notices: Notices,
    pub status: String,
    /// Where the current queue came from, for display.
    pub source: Option<String>,
    pub scanning: bool,

    /// Text typed into the open-path prompt while it is shown.
    pub prompt: Option<String>,
}

impl App {
    /// Create an `App` around `engine`, reading favorites from `favorites_store`.
    ///
    /// Unreadable favorites start out empty and are reported as a notice.
    pub fn new(engine: PlaybackEngine, favorites_store: FavoritesStore) -> Self {
        let mut notices = Notices::default();
        let favorites = match favorites_store.load() {
            Ok(f) => f,
            Err(e) => {
                notices.push(NoticeLevel::Error, format!("Failed to load favorites: {e}"));
                FavoritesSet::default()
            }
        };

        Self {
            engine,
            favorites,
            favorites_store,
            view_mode: ViewMode::AllSongs,
            selected: 0,
            follow_playback: true,
            notices,
            status: STATUS_READY.to_string(),
            source: None,
            scanning: false,
            prompt: None,
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.engine.store().is_empty()
    }

    /// Tracks shown under the current view mode.
    pub fn visible(&self) -> Vec<&Track> {
        view::visible(self.engine.store(), &self.favorites, self.view_mode)
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.visible().get(self.selected).copied()
    }

    pub fn is_favorite(&self, path: &Path) -> bool {
        self.favorites.contains(path)
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(level, message);
    }

    /// Turn an error into a notice and, for playback failures, the status line.
    pub fn report(&mut self, err: PlayerError) {
        match err {
            PlayerError::EmptyQueue => {
                self.notify(NoticeLevel::Warning, "Please select music files first");
            }
            PlayerError::PlaybackFailed { .. } => {
                tracing::warn!(error = %err, "playback failed");
                self.notify(NoticeLevel::Error, "Failed to play audio");
                self.status = "Error playing audio".to_string();
            }
            PlayerError::PersistenceIo { .. } => {
                self.notify(NoticeLevel::Error, format!("Could not save favorites: {err}"));
            }
            PlayerError::OutOfRange { .. } | PlayerError::ScanIo { .. } => {
                self.notify(NoticeLevel::Error, err.to_string());
            }
        }
    }

    // --- queue population ---

    /// Mark a scan as running. Returns `false` (and says so) if one already is.
    pub fn begin_scan(&mut self, request: &ScanRequest) -> bool {
        if self.scanning {
            self.notify(NoticeLevel::Warning, "A scan is already running");
            return false;
        }
        self.scanning = true;
        self.status = if request.is_folder() {
            "Scanning music folder...".to_string()
        } else {
            "Selecting music files...".to_string()
        };
        true
    }

    /// Apply a finished scan. A result with no tracks leaves the current
    /// queue untouched.
    pub fn finish_scan(&mut self, request: &ScanRequest, report: ScanReport) {
        self.scanning = false;
        self.status = STATUS_READY.to_string();
        let from_folder = request.is_folder();

        if report.tracks.is_empty() {
            if report.issues.is_empty() {
                self.notify(NoticeLevel::Warning, "No music files found");
            } else if from_folder {
                self.notify(NoticeLevel::Error, "Failed to scan music folder");
            } else {
                self.notify(NoticeLevel::Error, "Failed to load music files");
            }
            return;
        }

        if !report.issues.is_empty() {
            self.notify(
                NoticeLevel::Warning,
                format!("Skipped {} unreadable file(s)", report.issues.len()),
            );
        }

        let count = report.tracks.len();
        self.source = Some(match request {
            ScanRequest::Folder(root) => root.display().to_string(),
            ScanRequest::Files(_) => format!("{count} selected file(s)"),
        });
        self.selected = 0;

        if let Err(e) = self.engine.replace_queue(report.tracks) {
            self.report(e);
        } else {
            self.announce_loading();
        }

        let message = if from_folder {
            format!("Loaded {count} music file(s) from folder")
        } else {
            format!("Loaded {count} music file(s)")
        };
        self.notify(NoticeLevel::Success, message);
        self.sync_follow();
    }

    // --- transport ---

    pub fn toggle_play_pause(&mut self) {
        if !self.has_tracks() {
            self.report(PlayerError::EmptyQueue);
            return;
        }
        if self.engine.state().is_playing {
            self.engine.pause();
        } else {
            self.play();
        }
    }

    pub fn play(&mut self) {
        let before = self.engine.request();
        let result = self.engine.play();
        self.after_transport(before, result);
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// Play the track shown at `row` of the visible list.
    pub fn play_row(&mut self, row: usize) {
        let Some(index) = self
            .visible()
            .get(row)
            .and_then(|t| view::queue_index_of(self.engine.store(), t))
        else {
            return;
        };
        let before = self.engine.request();
        let result = self.engine.select_track(index);
        self.after_transport(before, result);
    }

    pub fn play_selected(&mut self) {
        self.follow_playback = true;
        self.play_row(self.selected);
    }

    pub fn next_track(&mut self) {
        let before = self.engine.request();
        let result = self.engine.next();
        self.after_transport(before, result);
    }

    pub fn previous_track(&mut self) {
        let before = self.engine.request();
        let result = self.engine.previous();
        self.after_transport(before, result);
    }

    fn after_transport(&mut self, before: RequestId, result: crate::error::Result<()>) {
        match result {
            Ok(()) => {
                if self.engine.request() != before {
                    self.announce_loading();
                }
                self.announce_now_playing();
                self.sync_follow();
            }
            Err(e) => self.report(e),
        }
    }

    fn announce_now_playing(&mut self) {
        if let Some(name) = self.engine.current_track().map(|t| t.name.clone()) {
            self.notify(NoticeLevel::Info, format!("Now Playing: {name}"));
        }
    }

    fn announce_loading(&mut self) {
        if let Some(name) = self.engine.current_track().map(|t| t.name.clone()) {
            self.status = format!("Loading: {name}");
        }
    }

    pub fn toggle_shuffle(&mut self) {
        let on = self.engine.toggle_shuffle();
        self.notify(NoticeLevel::Info, format!("Shuffle {}", on_off(on)));
    }

    pub fn toggle_repeat(&mut self) {
        let on = self.engine.toggle_repeat();
        self.notify(NoticeLevel::Info, format!("Repeat {}", on_off(on)));
    }

    pub fn volume_up(&mut self, step: u8) {
        let v = self.engine.volume_percent().saturating_add(step);
        self.engine.set_volume(v);
    }

    pub fn volume_down(&mut self, step: u8) {
        let v = self.engine.volume_percent().saturating_sub(step);
        self.engine.set_volume(v);
    }

    pub fn seek_fraction(&mut self, fraction: f64) {
        self.engine.seek(fraction);
    }

    pub fn scrub(&mut self, seconds: i64) {
        self.engine.scrub(seconds);
    }

    /// Feed one audio event to the engine, surfacing what it changed.
    pub fn handle_audio_event(&mut self, event: AudioEvent) {
        if event.request != self.engine.request() {
            let _ = self.engine.handle_event(event);
            return;
        }

        let kind = event.kind.clone();
        let before = self.engine.request();
        match self.engine.handle_event(event) {
            Ok(()) => match kind {
                AudioEventKind::Loaded(_) => self.status = STATUS_READY.to_string(),
                AudioEventKind::Ended => {
                    if self.engine.request() != before {
                        self.announce_loading();
                    }
                    if self.engine.state().is_playing {
                        self.announce_now_playing();
                    }
                    self.sync_follow();
                }
                AudioEventKind::TimeUpdate(_) | AudioEventKind::Error(_) => {}
            },
            Err(PlayerError::PlaybackFailed { path, reason }) => {
                tracing::warn!(path = %path.display(), %reason, "audio error");
                self.notify(NoticeLevel::Error, "Error playing audio file");
                self.status = "Error playing audio".to_string();
            }
            Err(e) => self.report(e),
        }
    }

    // --- favorites ---

    /// Flip the favorite flag of `path` and write the set through to storage.
    ///
    /// A failed save is reported; the in-memory change stays.
    pub fn toggle_favorite_path(&mut self, path: &Path) {
        let added = self.favorites.toggle(path);
        if added {
            self.notify(NoticeLevel::Success, "Added to favorites");
        } else {
            self.notify(NoticeLevel::Info, "Removed from favorites");
        }

        if let Err(e) = self.favorites_store.save(&self.favorites) {
            self.report(e);
        }
        self.clamp_selection();
    }

    pub fn toggle_favorite_selected(&mut self) {
        if let Some(path) = self.selected_track().map(|t| t.path.clone()) {
            self.toggle_favorite_path(&path);
        }
    }

    /// Favorite toggle for the playing track. Does nothing with an empty queue.
    pub fn toggle_favorite_current(&mut self) {
        let Some(path) = self.engine.current_track().map(|t| t.path.clone()) else {
            return;
        };
        self.toggle_favorite_path(&path);
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.engine.current_track().map(|t| t.path.clone())
    }

    // --- view & cursor ---

    pub fn toggle_favorites_view(&mut self) {
        self.view_mode = self.view_mode.toggled();
        self.selected = 0;
        self.sync_follow();
    }

    pub fn show_all_songs(&mut self) {
        self.view_mode = ViewMode::AllSongs;
        self.sync_follow();
        self.clamp_selection();
    }

    /// Move the cursor down one row, wrapping to the top.
    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.follow_playback = false;
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the cursor up one row, wrapping to the bottom.
    pub fn select_prev(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.follow_playback = false;
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn select_first(&mut self) {
        self.follow_playback = false;
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.follow_playback = false;
        self.selected = self.visible().len().saturating_sub(1);
    }

    /// Row of the current track in the visible list, if shown.
    pub fn current_row(&self) -> Option<usize> {
        let current = self.engine.current_track()?;
        self.visible().iter().position(|t| t.path == current.path)
    }

    /// Put the cursor on the current track when following playback.
    pub fn sync_follow(&mut self) {
        if !self.follow_playback {
            return;
        }
        if let Some(row) = self.current_row() {
            self.selected = row;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    // --- housekeeping ---

    pub fn expire_notices(&mut self, ttl: Duration) {
        self.notices.expire(Instant::now(), ttl);
    }

    pub fn player_state(&self) -> PlayerState {
        self.engine.player_state()
    }

    pub fn open_prompt(&mut self) {
        self.prompt = Some(String::new());
    }

    /// Close the prompt, returning what was typed.
    pub fn take_prompt(&mut self) -> Option<String> {
        self.prompt.take()
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}
