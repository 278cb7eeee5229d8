use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::tempdir;

use super::*;
use crate::config::LibrarySettings;
use crate::error::PlayerError;

fn names(report: &ScanReport) -> HashSet<String> {
    report.tracks.iter().map(|t| t.name.clone()).collect()
}

#[test]
fn is_audio_file_matches_allow_list_case_insensitive() {
    for ext in AUDIO_EXTENSIONS {
        assert!(is_audio_file(Path::new(&format!("/tmp/a.{ext}"))));
        assert!(is_audio_file(Path::new(&format!("/tmp/a.{}", ext.to_uppercase()))));
    }
    assert!(is_audio_file(Path::new("/tmp/a.Flac")));
    assert!(!is_audio_file(Path::new("/tmp/a.txt")));
    assert!(!is_audio_file(Path::new("/tmp/a.opus")));
    assert!(!is_audio_file(Path::new("/tmp/mp3")));
    assert!(!is_audio_file(Path::new("/tmp/a")));
}

#[test]
fn scan_excludes_disallowed_extensions() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("A.mp3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("B.wav"), b"not a real wav").unwrap();
    fs::write(dir.path().join("C.txt"), b"ignore me").unwrap();

    let report = scan(dir.path(), &LibrarySettings::default());

    assert_eq!(report.tracks.len(), 2);
    assert_eq!(
        names(&report),
        HashSet::from(["A.mp3".to_string(), "B.wav".to_string()])
    );
    assert!(report.issues.is_empty());
}

#[test]
fn scan_recurses_into_nested_directories() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("a").join("b").join("c");
    fs::create_dir_all(&deep).unwrap();
    fs::write(dir.path().join("root.ogg"), b"x").unwrap();
    fs::write(dir.path().join("a").join("one.M4A"), b"x").unwrap();
    fs::write(deep.join("three.aac"), b"x").unwrap();
    fs::write(deep.join("cover.jpg"), b"x").unwrap();

    let report = scan(dir.path(), &LibrarySettings::default());

    assert_eq!(
        names(&report),
        HashSet::from([
            "root.ogg".to_string(),
            "one.M4A".to_string(),
            "three.aac".to_string()
        ])
    );
}

#[test]
fn scan_records_size_and_absolute_path() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("song.flac");
    fs::write(&file, vec![0u8; 1234]).unwrap();

    let report = scan(dir.path(), &LibrarySettings::default());

    assert_eq!(report.tracks.len(), 1);
    let track = &report.tracks[0];
    assert_eq!(track.name, "song.flac");
    assert_eq!(track.size_bytes, 1234);
    assert!(track.path.is_absolute());
    assert_eq!(track.path.file_name(), file.file_name());
}

#[test]
fn scan_respects_max_depth() {
    let dir = tempdir().unwrap();
    let d1 = dir.path().join("d1");
    let d2 = d1.join("d2");
    fs::create_dir_all(&d2).unwrap();
    fs::write(dir.path().join("root.mp3"), b"x").unwrap();
    fs::write(d1.join("one.mp3"), b"x").unwrap();
    fs::write(d2.join("two.mp3"), b"x").unwrap();

    // Root is depth 0, so depth 2 sees root + d1/*, but not d1/d2/*.
    let settings = LibrarySettings {
        max_depth: Some(2),
        ..LibrarySettings::default()
    };
    let report = scan(dir.path(), &settings);

    let found = names(&report);
    assert!(found.contains("root.mp3"));
    assert!(found.contains("one.mp3"));
    assert!(!found.contains("two.mp3"));
}

#[test]
fn scan_of_missing_root_reports_issue_instead_of_failing() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");

    let report = scan(&missing, &LibrarySettings::default());

    assert!(report.tracks.is_empty());
    assert_eq!(report.issues.len(), 1);
    assert!(matches!(report.issues[0], PlayerError::ScanIo { .. }));
}

#[cfg(unix)]
#[test]
fn scan_skips_broken_symlink_and_keeps_siblings() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("good.mp3"), b"x").unwrap();
    std::os::unix::fs::symlink(dir.path().join("missing.mp3"), dir.path().join("dangling.mp3"))
        .unwrap();

    let report = scan(dir.path(), &LibrarySettings::default());

    assert_eq!(names(&report), HashSet::from(["good.mp3".to_string()]));
    assert_eq!(report.issues.len(), 1);
}

#[cfg(unix)]
#[test]
fn scan_terminates_on_symlink_cycle() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("a.mp3"), b"x").unwrap();
    std::os::unix::fs::symlink(dir.path(), sub.join("back-to-root")).unwrap();

    let report = scan(dir.path(), &LibrarySettings::default());

    assert_eq!(report.tracks.len(), 1);
    assert!(!report.issues.is_empty());
}

#[cfg(unix)]
#[test]
fn scan_skips_unreadable_subtree_and_keeps_siblings() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    let open = dir.path().join("open");
    fs::create_dir_all(&locked).unwrap();
    fs::create_dir_all(&open).unwrap();
    fs::write(locked.join("hidden.mp3"), b"x").unwrap();
    fs::write(open.join("song.mp3"), b"x").unwrap();
    fs::write(dir.path().join("top.mp3"), b"x").unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users read through the mode bits.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = scan(dir.path(), &LibrarySettings::default());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(
        names(&report),
        HashSet::from(["song.mp3".to_string(), "top.mp3".to_string()])
    );
    assert_eq!(report.issues.len(), 1);
    assert!(matches!(report.issues[0], PlayerError::ScanIo { .. }));
}

#[test]
fn list_files_skips_missing_entries_and_keeps_the_rest() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.mp3");
    let notes = dir.path().join("notes.txt");
    fs::write(&a, b"abc").unwrap();
    fs::write(&notes, b"abcdef").unwrap();
    let gone = dir.path().join("gone.mp3");

    let report = list_files(&[a.clone(), gone.clone(), notes.clone()]);

    // Explicitly picked files are not filtered by extension.
    let got: Vec<&str> = report.tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(got, vec!["a.mp3", "notes.txt"]);
    assert_eq!(report.tracks[1].size_bytes, 6);
    assert_eq!(report.issues.len(), 1);
    match &report.issues[0] {
        PlayerError::ScanIo { path, .. } => assert_eq!(path.file_name(), gone.file_name()),
        other => panic!("unexpected issue: {other:?}"),
    }
}

#[test]
fn list_files_rejects_directories() {
    let dir = tempdir().unwrap();
    let report = list_files(&[dir.path().to_path_buf()]);
    assert!(report.tracks.is_empty());
    assert_eq!(report.issues.len(), 1);
}

#[test]
fn scan_request_from_path_distinguishes_folders_and_files() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("x.mp3");
    fs::write(&file, b"x").unwrap();

    assert!(ScanRequest::from_path(dir.path().to_path_buf()).is_folder());
    assert_eq!(
        ScanRequest::from_path(file.clone()),
        ScanRequest::Files(vec![file.clone()])
    );

    let report = ScanRequest::Folder(dir.path().to_path_buf()).run(&LibrarySettings::default());
    assert_eq!(report.tracks.len(), 1);
}

fn track(path: &str) -> Track {
    Track {
        path: PathBuf::from(path),
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        size_bytes: 0,
        modified_at: std::time::SystemTime::UNIX_EPOCH,
    }
}

#[test]
fn track_store_get_fails_out_of_range() {
    let store = TrackStore::new(vec![track("/m/a.mp3"), track("/m/b.mp3")]);
    assert_eq!(store.get(1).unwrap().name, "b.mp3");
    assert!(matches!(
        store.get(2),
        Err(PlayerError::OutOfRange { index: 2, len: 2 })
    ));
    assert!(matches!(
        TrackStore::default().get(0),
        Err(PlayerError::OutOfRange { index: 0, len: 0 })
    ));
}

#[test]
fn track_store_replace_and_identity_lookup() {
    let mut store = TrackStore::new(vec![track("/m/a.mp3")]);
    store.replace(vec![track("/m/x.mp3"), track("/m/y.mp3")]);
    assert_eq!(store.len(), 2);
    assert_eq!(store.position_of(Path::new("/m/y.mp3")), Some(1));
    assert_eq!(store.position_of(Path::new("/m/a.mp3")), None);
}

#[test]
fn format_time_renders_minutes_and_padded_seconds() {
    assert_eq!(format_time(None), "0:00");
    assert_eq!(format_time(Some(Duration::from_secs(5))), "0:05");
    assert_eq!(format_time(Some(Duration::from_millis(125_900))), "2:05");
    assert_eq!(format_time(Some(Duration::from_secs(3600))), "60:00");
}

#[test]
fn format_file_size_uses_binary_units_and_trims_zeros() {
    assert_eq!(format_file_size(0), "0 Bytes");
    assert_eq!(format_file_size(500), "500 Bytes");
    assert_eq!(format_file_size(1024), "1 KB");
    assert_eq!(format_file_size(1536), "1.5 KB");
    assert_eq!(format_file_size(5 * 1024 * 1024 + 1024 * 1024 / 4), "5.25 MB");
    assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
}
