//! Colors and text styles for the slip viewer.

use ratatui::style::{Color, Modifier, Style};

// Palette
pub const TEAL: Color = Color::Rgb(56, 150, 140);
pub const AMBER: Color = Color::Rgb(214, 158, 46);
pub const RED: Color = Color::Rgb(200, 80, 70);
pub const GREY: Color = Color::Rgb(120, 124, 130);
pub const TEXT: Color = Color::Rgb(224, 226, 228);
const SELECTION_BG: Color = Color::Rgb(40, 52, 58);
const STATUS_BG: Color = Color::Rgb(28, 34, 38);

pub fn title_style() -> Style {
    Style::new().fg(TEAL).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::new().bg(SELECTION_BG).fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::new().fg(TEXT)
}

pub fn muted_style() -> Style {
    Style::new().fg(GREY)
}

pub fn accent_style() -> Style {
    Style::new().fg(AMBER)
}

/// Marks messages that were already copied in this session.
pub fn copied_style() -> Style {
    Style::new().fg(TEAL).add_modifier(Modifier::DIM)
}

pub fn error_style() -> Style {
    Style::new().fg(RED).add_modifier(Modifier::BOLD)
}

pub fn border_style(focused: bool) -> Style {
    Style::new().fg(if focused { TEAL } else { GREY })
}

pub fn input_style() -> Style {
    Style::new().fg(AMBER).add_modifier(Modifier::UNDERLINED)
}

pub fn status_bar_style() -> Style {
    Style::new().bg(STATUS_BG).fg(TEXT)
}

pub fn key_hint_style() -> Style {
    Style::new().fg(AMBER).add_modifier(Modifier::BOLD)
}
