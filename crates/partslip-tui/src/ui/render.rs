use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState};
use crate::utils::format::truncate_string;

use super::messages;
use super::styles;

/// Characters of the URL shown inside the input box.
const URL_FIELD_WIDTH: usize = 56;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::EnteringUrl) {
        render_url_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Part Slips";
    let help_hint = "[?] Help";
    let sheet = app
        .config
        .sheet_url
        .as_deref()
        .map(|url| format!("  {}", truncate_string(url, 48)))
        .unwrap_or_default();
    let used = title.len() + sheet.chars().count() + help_hint.len() + 4;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(sheet, styles::muted_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if !app.messages.is_empty() {
        messages::render(frame, app, area);
        return;
    }

    let (text, style) = if app.loading {
        ("Loading assignments...".to_string(), styles::muted_style())
    } else if let Some(ref error) = app.load_error {
        (error.clone(), styles::error_style())
    } else if app.schedule.is_some() {
        (
            "No assignments found. Please check your sheet format.".to_string(),
            styles::accent_style(),
        )
    } else {
        (
            "Press [o] to open a Google Sheet URL".to_string(),
            styles::muted_style(),
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(vec![Line::from(""), Line::styled(text, style)])
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[c]opy | [u]pdate | [o]pen | [q]uit";

    let left_text = format!(" {} ", app.status_text());
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let left_style = if app.load_error.is_some() {
        styles::error_style()
    } else {
        styles::muted_style()
    };

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key, styles::key_hint_style()),
        Span::styled(desc, styles::list_item_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 20, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  Part Slips", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::accent_style())),
        help_line("  ↑/↓ j/k   ", "Navigate list / scroll message"),
        help_line("  PgUp/PgDn ", "Page up/down"),
        help_line("  Home/End  ", "First/last assignment"),
        help_line("  Tab       ", "Switch focus (list ↔ message)"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::accent_style())),
        help_line("  Enter/c   ", "Copy message to clipboard"),
        help_line("  o         ", "Open a sheet URL"),
        help_line("  u         ", "Reload the sheet"),
        help_line("  q         ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::key_hint_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::key_hint_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_url_overlay(frame: &mut Frame, app: &App) {
    let height = if app.url_error.is_some() { 10 } else { 8 };
    let area = centered_rect_fixed(64, height, frame.area());
    frame.render_widget(Clear, area);

    // Show the tail of long URLs so the cursor stays visible
    let chars: Vec<char> = app.url_input.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(URL_FIELD_WIDTH - 1)..]
        .iter()
        .collect();

    let mut lines = vec![
        Line::from(Span::styled(
            " Google Sheet or proxy URL:",
            styles::accent_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" [", styles::muted_style()),
            Span::styled(
                format!("{:<width$}", format!("{}▌", visible), width = URL_FIELD_WIDTH),
                styles::input_style(),
            ),
            Span::styled("]", styles::muted_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Enter", styles::key_hint_style()),
            Span::styled(" load   ", styles::muted_style()),
            Span::styled("Esc", styles::key_hint_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    if let Some(ref error) = app.url_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(" Open Sheet ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::accent_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::key_hint_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::key_hint_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
