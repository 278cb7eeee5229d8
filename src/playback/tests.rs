use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use proptest::prelude::*;

use super::{PlaybackEngine, PlayerState};
use crate::audio::fake::{FakeOutput, OutputCall};
use crate::audio::{AudioEvent, AudioEventKind, RequestId};
use crate::error::PlayerError;
use crate::library::Track;

fn track(name: &str) -> Track {
    Track {
        path: PathBuf::from("/music").join(name),
        name: name.to_string(),
        size_bytes: 1024,
        modified_at: SystemTime::UNIX_EPOCH,
    }
}

fn tracks(n: usize) -> Vec<Track> {
    (0..n).map(|i| track(&format!("{i}.mp3"))).collect()
}

fn engine_with(n: usize) -> (PlaybackEngine, FakeOutput) {
    let fake = FakeOutput::new();
    let mut engine = PlaybackEngine::with_seed(Box::new(fake.clone()), 7);
    engine.replace_queue(tracks(n)).unwrap();
    (engine, fake)
}

fn current_request(fake: &FakeOutput) -> RequestId {
    fake.last_load().map(|(r, _)| r).unwrap()
}

#[test]
fn empty_engine_rejects_transport() {
    let fake = FakeOutput::new();
    let mut engine = PlaybackEngine::new(Box::new(fake.clone()));

    assert_eq!(engine.player_state(), PlayerState::Empty);
    assert!(matches!(engine.play(), Err(PlayerError::EmptyQueue)));
    assert!(!engine.state().is_playing);
    assert!(matches!(engine.next(), Err(PlayerError::EmptyQueue)));
    assert!(matches!(engine.previous(), Err(PlayerError::EmptyQueue)));

    engine.pause();
    engine.stop();
    assert!(fake.calls().is_empty());
}

#[test]
fn replace_queue_loads_first_track_paused() {
    let (engine, fake) = engine_with(3);

    assert_eq!(engine.state().current_index, 0);
    assert_eq!(engine.player_state(), PlayerState::Paused);
    assert_eq!(
        fake.calls(),
        vec![OutputCall::Load(RequestId::default().next(), PathBuf::from("/music/0.mp3"))]
    );
}

#[test]
fn replace_queue_keeps_flags_and_resets_index() {
    let (mut engine, _fake) = engine_with(3);
    engine.toggle_shuffle();
    engine.toggle_repeat();
    engine.select_track(2).unwrap();

    engine.replace_queue(tracks(5)).unwrap();
    let state = engine.state();
    assert_eq!(state.current_index, 0);
    assert!(!state.is_playing);
    assert!(state.is_shuffled);
    assert!(state.is_repeated);
}

#[test]
fn replacing_with_nothing_empties_the_engine() {
    let (mut engine, _fake) = engine_with(3);
    engine.play().unwrap();
    engine.replace_queue(Vec::new()).unwrap();

    assert_eq!(engine.player_state(), PlayerState::Empty);
    assert!(engine.current_track().is_none());
}

#[test]
fn events_from_before_an_empty_replacement_are_dropped() {
    let (mut engine, fake) = engine_with(3);
    engine.play().unwrap();
    let old = current_request(&fake);
    engine.replace_queue(Vec::new()).unwrap();

    assert_ne!(engine.request(), old);
    engine
        .handle_event(AudioEvent::new(old, AudioEventKind::Ended))
        .unwrap();
    engine
        .handle_event(AudioEvent::new(old, AudioEventKind::Error("late".into())))
        .unwrap();
    assert_eq!(engine.player_state(), PlayerState::Empty);
}

#[test]
fn play_uses_already_loaded_source() {
    let (mut engine, fake) = engine_with(2);
    let request = current_request(&fake);
    fake.clear();

    engine.play().unwrap();
    assert_eq!(fake.calls(), vec![OutputCall::Play(request)]);
    assert_eq!(engine.player_state(), PlayerState::Playing);
}

#[test]
fn play_on_empty_queue_reports_empty_queue() {
    let fake = FakeOutput::new();
    let mut engine = PlaybackEngine::new(Box::new(fake));
    let err = engine.play().unwrap_err();
    assert!(matches!(err, PlayerError::EmptyQueue));
    assert!(!engine.state().is_playing);
}

#[test]
fn failed_play_reverts_to_paused_and_keeps_index() {
    let (mut engine, fake) = engine_with(3);
    engine.select_track(1).unwrap();
    engine.pause();
    fake.set_fail_play(true);

    let err = engine.play().unwrap_err();
    assert!(matches!(err, PlayerError::PlaybackFailed { .. }));
    assert!(!engine.state().is_playing);
    assert_eq!(engine.state().current_index, 1);
}

#[test]
fn toggle_flips_between_playing_and_paused() {
    let (mut engine, fake) = engine_with(2);
    engine.toggle().unwrap();
    assert_eq!(engine.player_state(), PlayerState::Playing);
    engine.toggle().unwrap();
    assert_eq!(engine.player_state(), PlayerState::Paused);
    assert_eq!(fake.calls().last(), Some(&OutputCall::Pause));
}

#[test]
fn pause_when_paused_is_a_no_op() {
    let (mut engine, fake) = engine_with(2);
    fake.clear();
    engine.pause();
    assert!(fake.calls().is_empty());
}

#[test]
fn stop_pauses_and_rewinds() {
    let (mut engine, fake) = engine_with(2);
    engine.play().unwrap();
    fake.clear();

    engine.stop();
    assert_eq!(
        fake.calls(),
        vec![OutputCall::Pause, OutputCall::Seek(Duration::ZERO)]
    );
    assert_eq!(engine.position(), Duration::ZERO);
    assert_eq!(engine.player_state(), PlayerState::Paused);
}

#[test]
fn select_track_out_of_range_changes_nothing() {
    let (mut engine, fake) = engine_with(3);
    fake.clear();

    let err = engine.select_track(3).unwrap_err();
    assert!(matches!(err, PlayerError::OutOfRange { index: 3, len: 3 }));
    assert_eq!(engine.state().current_index, 0);
    assert!(!engine.state().is_playing);
    assert!(fake.calls().is_empty());
}

#[test]
fn select_track_loads_and_plays() {
    let (mut engine, fake) = engine_with(3);
    engine.select_track(2).unwrap();

    let (request, path) = fake.last_load().unwrap();
    assert_eq!(path, PathBuf::from("/music/2.mp3"));
    assert_eq!(fake.calls().last(), Some(&OutputCall::Play(request)));
    assert_eq!(engine.current_track().map(|t| t.name.as_str()), Some("2.mp3"));
}

#[test]
fn previous_from_first_wraps_to_last() {
    let (mut engine, _fake) = engine_with(3);
    engine.previous().unwrap();
    assert_eq!(engine.state().current_index, 2);
}

#[test]
fn next_then_previous_returns_to_start() {
    let (mut engine, _fake) = engine_with(4);
    for start in 0..4 {
        engine.select_track(start).unwrap();
        engine.next().unwrap();
        engine.previous().unwrap();
        assert_eq!(engine.state().current_index, start);
    }
}

#[test]
fn next_wraps_at_the_end() {
    let (mut engine, _fake) = engine_with(3);
    engine.select_track(2).unwrap();
    engine.next().unwrap();
    assert_eq!(engine.state().current_index, 0);
}

#[test]
fn previous_ignores_shuffle() {
    let (mut engine, _fake) = engine_with(5);
    engine.toggle_shuffle();
    engine.select_track(3).unwrap();
    engine.previous().unwrap();
    assert_eq!(engine.state().current_index, 2);
}

#[test]
fn shuffled_next_stays_in_range_and_varies() {
    let (mut engine, _fake) = engine_with(10);
    engine.toggle_shuffle();

    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..200 {
        engine.next().unwrap();
        let i = engine.state().current_index;
        assert!(i < 10);
        seen.insert(i);
    }
    assert!(seen.len() > 1);
}

#[test]
fn track_end_with_repeat_restarts_same_track() {
    let (mut engine, fake) = engine_with(3);
    engine.toggle_shuffle();
    engine.toggle_repeat();
    engine.select_track(1).unwrap();
    let request = current_request(&fake);
    fake.clear();

    engine.on_track_ended().unwrap();
    assert_eq!(engine.state().current_index, 1);
    assert_eq!(
        fake.calls(),
        vec![OutputCall::Seek(Duration::ZERO), OutputCall::Play(request)]
    );
}

#[test]
fn track_end_without_repeat_advances() {
    let (mut engine, _fake) = engine_with(3);
    engine.play().unwrap();
    engine.on_track_ended().unwrap();
    assert_eq!(engine.state().current_index, 1);
    assert!(engine.state().is_playing);
}

#[test]
fn ended_event_drives_advance() {
    let (mut engine, fake) = engine_with(3);
    engine.play().unwrap();
    let request = current_request(&fake);

    engine
        .handle_event(AudioEvent::new(request, AudioEventKind::Ended))
        .unwrap();
    assert_eq!(engine.state().current_index, 1);
    assert_ne!(current_request(&fake), request);
}

#[test]
fn stale_events_are_dropped() {
    let (mut engine, fake) = engine_with(3);
    let old = current_request(&fake);
    engine.select_track(2).unwrap();

    engine
        .handle_event(AudioEvent::new(old, AudioEventKind::Ended))
        .unwrap();
    engine
        .handle_event(AudioEvent::new(old, AudioEventKind::Error("late".into())))
        .unwrap();
    engine
        .handle_event(AudioEvent::new(
            old,
            AudioEventKind::Loaded(Some(Duration::from_secs(9))),
        ))
        .unwrap();

    assert_eq!(engine.state().current_index, 2);
    assert!(engine.state().is_playing);
    assert_eq!(engine.duration(), None);
}

#[test]
fn error_event_pauses_and_forces_reload() {
    let (mut engine, fake) = engine_with(3);
    engine.select_track(1).unwrap();
    let request = current_request(&fake);

    let err = engine
        .handle_event(AudioEvent::new(
            request,
            AudioEventKind::Error("unsupported codec".into()),
        ))
        .unwrap_err();
    match err {
        PlayerError::PlaybackFailed { path, reason } => {
            assert_eq!(path, PathBuf::from("/music/1.mp3"));
            assert_eq!(reason, "unsupported codec");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!engine.state().is_playing);
    assert_eq!(engine.state().current_index, 1);

    fake.clear();
    engine.play().unwrap();
    assert!(matches!(fake.calls().first(), Some(OutputCall::Load(_, _))));
}

#[test]
fn time_updates_track_position() {
    let (mut engine, fake) = engine_with(1);
    let request = current_request(&fake);
    engine
        .handle_event(AudioEvent::new(
            request,
            AudioEventKind::TimeUpdate(Duration::from_secs(42)),
        ))
        .unwrap();
    assert_eq!(engine.position(), Duration::from_secs(42));
}

#[test]
fn seek_without_duration_is_silent() {
    let (mut engine, fake) = engine_with(1);
    fake.clear();
    engine.seek(0.5);
    assert!(fake.calls().is_empty());
}

#[test]
fn seek_clamps_fraction_and_ignores_nan() {
    let (mut engine, fake) = engine_with(1);
    let request = current_request(&fake);
    engine
        .handle_event(AudioEvent::new(
            request,
            AudioEventKind::Loaded(Some(Duration::from_secs(200))),
        ))
        .unwrap();
    fake.clear();

    engine.seek(0.25);
    engine.seek(7.0);
    engine.seek(-1.0);
    engine.seek(f64::NAN);
    assert_eq!(
        fake.calls(),
        vec![
            OutputCall::Seek(Duration::from_secs(50)),
            OutputCall::Seek(Duration::from_secs(200)),
            OutputCall::Seek(Duration::ZERO),
        ]
    );
}

#[test]
fn scrub_moves_relative_to_position() {
    let (mut engine, fake) = engine_with(1);
    let request = current_request(&fake);
    engine
        .handle_event(AudioEvent::new(
            request,
            AudioEventKind::Loaded(Some(Duration::from_secs(100))),
        ))
        .unwrap();
    engine
        .handle_event(AudioEvent::new(
            request,
            AudioEventKind::TimeUpdate(Duration::from_secs(10)),
        ))
        .unwrap();

    engine.scrub(5);
    assert_eq!(engine.position(), Duration::from_secs(15));
    engine.scrub(-60);
    assert_eq!(engine.position(), Duration::ZERO);
}

#[test]
fn volume_is_clamped_and_forwarded() {
    let (mut engine, fake) = engine_with(1);
    fake.clear();

    engine.set_volume(40);
    assert_eq!(engine.volume_percent(), 40);
    engine.set_volume(250);
    assert_eq!(engine.volume_percent(), 100);
    assert_eq!(
        fake.calls(),
        vec![OutputCall::SetVolume(0.4), OutputCall::SetVolume(1.0)]
    );
}

#[test]
fn shutdown_reaches_the_output() {
    let (mut engine, fake) = engine_with(1);
    engine.shutdown();
    assert!(fake.was_shut_down());
}

#[derive(Debug, Clone)]
enum Op {
    Play,
    Pause,
    Next,
    Previous,
    Select(usize),
    Replace(usize),
    Ended,
    Shuffle,
    Repeat,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Play),
        Just(Op::Pause),
        Just(Op::Next),
        Just(Op::Previous),
        (0usize..12).prop_map(Op::Select),
        (0usize..8).prop_map(Op::Replace),
        Just(Op::Ended),
        Just(Op::Shuffle),
        Just(Op::Repeat),
    ]
}

proptest! {
    #[test]
    fn current_index_stays_in_bounds(
        seed in any::<u64>(),
        ops in proptest::collection::vec(op(), 1..64),
    ) {
        let fake = FakeOutput::new();
        let mut engine = PlaybackEngine::with_seed(Box::new(fake), seed);
        engine.replace_queue(tracks(4)).unwrap();

        for op in ops {
            let _ = match op {
                Op::Play => engine.play(),
                Op::Pause => { engine.pause(); Ok(()) }
                Op::Next => engine.next(),
                Op::Previous => engine.previous(),
                Op::Select(i) => engine.select_track(i),
                Op::Replace(n) => engine.replace_queue(tracks(n)),
                Op::Ended => engine.on_track_ended(),
                Op::Shuffle => { engine.toggle_shuffle(); Ok(()) }
                Op::Repeat => { engine.toggle_repeat(); Ok(()) }
            };

            let len = engine.store().len();
            if len > 0 {
                prop_assert!(engine.state().current_index < len);
            } else {
                prop_assert!(!engine.state().is_playing);
            }
        }
    }

    #[test]
    fn repeat_never_moves_the_index(start in 0usize..6, ends in 1usize..10) {
        let fake = FakeOutput::new();
        let mut engine = PlaybackEngine::with_seed(Box::new(fake), 1);
        engine.replace_queue(tracks(6)).unwrap();
        engine.toggle_repeat();
        engine.select_track(start).unwrap();

        for _ in 0..ends {
            engine.on_track_ended().unwrap();
            prop_assert_eq!(engine.state().current_index, start);
        }
    }
}
