use std::sync::mpsc::Sender;
use std::thread;

use crate::app::App;
use crate::config::LibrarySettings;
use crate::library::{ScanReport, ScanRequest};

/// A finished scan, handed back to the event loop.
pub struct ScanDone {
    pub request: ScanRequest,
    pub report: ScanReport,
}

/// Run `request` on a worker thread unless a scan is already in flight.
pub fn start_scan(
    app: &mut App,
    request: ScanRequest,
    library: &LibrarySettings,
    tx: &Sender<ScanDone>,
) {
    if !app.begin_scan(&request) {
        return;
    }

    let library = library.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        let report = request.run(&library);
        let _ = tx.send(ScanDone { request, report });
    });
}
