use crate::app::App;
use crate::mpris::MprisHandle;

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let index = app
        .engine
        .current_track()
        .map(|_| app.engine.state().current_index);
    mpris.set_track_metadata(index, app.engine.current_track(), app.engine.duration());
    mpris.set_playback(app.player_state());
}
