//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, NoticeLevel};
use crate::config::{ControlsSettings, UiSettings};
use crate::library::{format_file_size, format_time};
use crate::playback::PlayerState;
use crate::view::ViewMode;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("zz", "jump to playing");
    map.insert("enter", "play selected");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next");
    // H/L is filled dynamically from config.
    map.insert("0-9", "seek");
    map.insert("+/-", "volume");
    map.insert("s", "shuffle");
    map.insert("r", "repeat");
    map.insert("f/*", "favorite row/playing");
    map.insert("v/a", "favorites/all");
    map.insert("o", "open");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "gg/G", "zz", "0-9", "+/-", "s", "r", "f/*",
        "v/a", "o", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

fn status_text(app: &App) -> String {
    let engine = &app.engine;
    let state = engine.state();
    let mut parts: Vec<String> = Vec::new();

    match engine.current_track() {
        Some(track) => {
            parts.push(format!(
                "Song: {} [{} / {}]",
                track.name,
                format_time(Some(engine.position())),
                format_time(engine.duration())
            ));
        }
        None => parts.push("No music selected".to_string()),
    }
    parts.push(engine.player_state().label().to_string());
    parts.push(format!("Vol: {}%", engine.volume_percent()));
    parts.push(format!("Shuffle: {}", on_off(state.is_shuffled)));
    parts.push(format!("Repeat: {}", on_off(state.is_repeated)));
    parts.push(format!("View: {}", app.view_mode.label()));
    if app.follow_playback {
        parts.push("CURSOR: Follow".to_string());
    } else {
        parts.push("CURSOR: Free-roam".to_string());
    }
    if let Some(src) = &app.source {
        parts.push(format!("Source: {}", src));
    }
    parts.push(app.status.clone());

    parts.join(" • ")
}

fn notice_style(level: NoticeLevel) -> Style {
    let color = match level {
        NoticeLevel::Info => Color::Cyan,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    };
    Style::default().fg(color)
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

fn draw_track_list(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible();
    let total = visible.len();
    let title = format!(" tracks ({}) ", total);

    if total == 0 {
        let (headline, hint) = match app.view_mode {
            ViewMode::AllSongs => ("No music selected", "Press o to add music"),
            ViewMode::FavoritesOnly => ("No favorite songs", "Press f on a track to add it"),
        };
        let empty = Paragraph::new(format!("{headline}\n{hint}"))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(empty, area);
        return;
    }

    let current = app.engine.current_track().map(|t| t.path.clone());
    let playing = app.player_state() == PlayerState::Playing;

    // Center the selected item when possible by creating a visible window.
    // Only build ListItems for the visible window.
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = app.selected.min(total - 1);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let items: Vec<ListItem> = visible[start..end]
        .iter()
        .map(|track| {
            let is_current = current.as_deref() == Some(track.path.as_path());
            let marker = match (is_current, playing) {
                (true, true) => "▶ ",
                (true, false) => "‖ ",
                _ => "  ",
            };
            let heart = if app.is_favorite(&track.path) { "♥ " } else { "  " };
            let mut name = Span::raw(track.name.clone());
            if is_current {
                name = name.style(Style::default().add_modifier(Modifier::BOLD));
            }
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::styled(heart, Style::default().fg(Color::Red)),
                name,
                Span::styled(
                    format!("  {}", format_file_size(track.size_bytes)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(selected_pos_in_visible));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app))
        .block(padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    draw_track_list(frame, app, chunks[2]);

    let notice = match app.notices.latest() {
        Some(n) => Paragraph::new(Span::styled(n.message.as_str(), notice_style(n.level))),
        None => Paragraph::new(""),
    };
    let notice_title = match app.notices.len() {
        0 | 1 => " notices ".to_string(),
        n => format!(" notices ({n}) "),
    };
    frame.render_widget(notice.block(padded(&notice_title)), chunks[3]);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    // Open-path prompt overlays the track list.
    if let Some(input) = &app.prompt {
        let popup_area = centered_rect_sized(72, 3, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let prompt = Paragraph::new(format!("{input}_"))
            .block(padded(" open file or folder (enter: load, esc: cancel) "));
        frame.render_widget(prompt, popup_area);
    }
}
