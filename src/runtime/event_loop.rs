use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioEvent;
use crate::config;
use crate::library::ScanRequest;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playback::PlayerState;
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::scanner::{ScanDone, start_scan};
use crate::ui;

/// What MPRIS was last told, to avoid republishing unchanged state.
type MprisSnapshot = (Option<PathBuf>, PlayerState, Option<Duration>);

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    pending_zz: bool,
    last_mpris: Option<MprisSnapshot>,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_prefixes(&mut self) {
        self.pending_gg = false;
        self.pending_zz = false;
    }
}

/// Channels the event loop drains every iteration.
pub struct Inbox<'a> {
    pub audio: &'a Receiver<AudioEvent>,
    pub scans: &'a Receiver<ScanDone>,
    pub scan_tx: &'a Sender<ScanDone>,
    pub control: &'a Receiver<ControlCmd>,
}

/// Main terminal event loop: handles input, drawing, audio events, scan
/// results and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    inbox: Inbox<'_>,
    mpris: &MprisHandle,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let notice_ttl = Duration::from_millis(settings.ui.notice_ms);

    loop {
        while let Ok(ev) = inbox.audio.try_recv() {
            app.handle_audio_event(ev);
        }
        while let Ok(done) = inbox.scans.try_recv() {
            app.finish_scan(&done.request, done.report);
        }
        if !app.notices.is_empty() {
            app.expire_notices(notice_ttl);
        }

        // Keep MPRIS in sync even when playback changes come from auto-advance.
        let snapshot = (app.current_path(), app.player_state(), app.engine.duration());
        if state.last_mpris.as_ref() != Some(&snapshot) {
            update_mpris(mpris, app);
            state.last_mpris = Some(snapshot);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = inbox.control.try_recv() {
            if handle_control_cmd(cmd, app) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, inbox.scan_tx, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply a transport command. Returns `true` when the app should quit.
fn handle_control_cmd(cmd: ControlCmd, app: &mut App) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            if app.player_state() != PlayerState::Playing {
                app.play();
            }
        }
        ControlCmd::Pause => app.pause(),
        ControlCmd::PlayPause => app.toggle_play_pause(),
        ControlCmd::Stop => app.stop(),
        ControlCmd::Next => app.next_track(),
        ControlCmd::Prev => app.previous_track(),
    }
    false
}

fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(input)
}

fn handle_prompt_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    scan_tx: &Sender<ScanDone>,
) {
    match key.code {
        KeyCode::Esc => {
            app.take_prompt();
        }
        KeyCode::Enter => {
            let input = app.take_prompt().unwrap_or_default();
            let input = input.trim();
            if !input.is_empty() {
                let request = ScanRequest::from_path(expand_home(input));
                start_scan(app, request, &settings.library, scan_tx);
            }
        }
        KeyCode::Backspace => {
            if let Some(p) = app.prompt.as_mut() {
                p.pop();
            }
        }
        KeyCode::Char(c) if !c.is_control() => {
            if let Some(p) = app.prompt.as_mut() {
                p.push(c);
            }
        }
        _ => {}
    }
}

/// Returns `true` when the app should quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    scan_tx: &Sender<ScanDone>,
    state: &mut EventLoopState,
) -> bool {
    if app.prompt.is_some() {
        state.clear_prefixes();
        handle_prompt_key(key, settings, app, scan_tx);
        return false;
    }

    match key.code {
        KeyCode::Char('g') => {
            state.pending_zz = false;
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
            return false;
        }
        KeyCode::Char('z') => {
            state.pending_gg = false;
            if state.pending_zz {
                state.pending_zz = false;
                app.follow_playback = true;
                app.sync_follow();
            } else {
                state.pending_zz = true;
            }
            return false;
        }
        _ => state.clear_prefixes(),
    }

    let scrub = i64::try_from(settings.controls.scrub_seconds).unwrap_or(i64::MAX);
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('o') => app.open_prompt(),
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => app.play_selected(),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            handle_control_cmd(ControlCmd::PlayPause, app);
        }
        KeyCode::Char('l') | KeyCode::Right => {
            handle_control_cmd(ControlCmd::Next, app);
        }
        KeyCode::Char('h') | KeyCode::Left => {
            handle_control_cmd(ControlCmd::Prev, app);
        }
        KeyCode::Char('L') => app.scrub(scrub),
        KeyCode::Char('H') => app.scrub(-scrub),
        KeyCode::Char(c @ '0'..='9') => {
            let tenth = c.to_digit(10).unwrap_or(0);
            app.seek_fraction(f64::from(tenth) / 10.0);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => app.volume_up(settings.ui.volume_step),
        KeyCode::Char('-') => app.volume_down(settings.ui.volume_step),
        // Ctrl+S / Ctrl+R arrive as the same chars with CONTROL set.
        KeyCode::Char('s') => app.toggle_shuffle(),
        KeyCode::Char('r') => app.toggle_repeat(),
        KeyCode::Char('f') => app.toggle_favorite_selected(),
        KeyCode::Char('*') => app.toggle_favorite_current(),
        KeyCode::Char('v') => app.toggle_favorites_view(),
        KeyCode::Char('a') => app.show_all_songs(),
        _ => {}
    }

    false
}
