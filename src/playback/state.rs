/// Transport state and ordering flags.
///
/// `current_index` is only meaningful while the queue is non-empty, and is
/// then always within `[0, len)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub is_playing: bool,
    pub is_shuffled: bool,
    pub is_repeated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Empty,
    Paused,
    Playing,
}

impl PlayerState {
    pub fn label(self) -> &'static str {
        match self {
            PlayerState::Empty => "Stopped",
            PlayerState::Paused => "Paused",
            PlayerState::Playing => "Playing",
        }
    }
}
