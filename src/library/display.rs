use std::time::Duration;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a playback position as `m:ss`; unknown positions render as `0:00`.
pub fn format_time(d: Option<Duration>) -> String {
    let secs = d.map_or(0, |d| d.as_secs());
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Human-readable file size with base-1024 units and at most two decimals,
/// e.g. `1.5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit + 1 < SIZE_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}
