mod app;
mod audio;
mod config;
mod error;
mod favorites;
mod library;
mod logging;
mod mpris;
mod playback;
mod runtime;
mod ui;
mod view;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
