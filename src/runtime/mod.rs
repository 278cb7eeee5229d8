use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::RodioOutput;
use crate::mpris::ControlCmd;
use crate::playback::PlaybackEngine;

mod event_loop;
mod mpris_sync;
mod scanner;
mod settings;
mod startup;

/// Composition root: build the app from settings and arguments, then hand
/// the terminal to the event loop until the user quits.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    crate::logging::init(&settings);

    let (output, audio_events) = RodioOutput::new(settings.audio.clone());
    let engine = PlaybackEngine::new(Box::new(output));
    let mut app = App::new(engine, startup::favorites_store(&settings));
    startup::apply_playback_defaults(&mut app, &settings);

    let (scan_tx, scan_rx) = mpsc::channel::<scanner::ScanDone>();
    let args: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    match startup::initial_request(args) {
        Some(request) => scanner::start_scan(&mut app, request, &settings.library, &scan_tx),
        None => startup::greet(&mut app),
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    mpris_sync::update_mpris(&mpris, &app);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        event_loop::Inbox {
            audio: &audio_events,
            scans: &scan_rx,
            scan_tx: &scan_tx,
            control: &control_rx,
        },
        &mpris,
        &mut state,
    );

    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        tracing::error!(error = %e, "event loop failed");
    }
    tracing::info!("cadenza exiting");
    run_result
}
