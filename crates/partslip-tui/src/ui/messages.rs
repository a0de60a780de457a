use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::format::truncate_string;

/// Longest title shown in the list panel before truncation.
const MAX_TITLE_CHARS: usize = 40;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_message_list(frame, app, chunks[0]);
    render_message_body(frame, app, chunks[1]);
}

fn render_message_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            let mark = if app.copied.contains(&i) { "✓ " } else { "  " };
            let line = Line::from(vec![
                Span::styled(mark, styles::copied_style()),
                Span::raw(truncate_string(&message.title, MAX_TITLE_CHARS)),
            ]);

            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let focused = matches!(app.focus, Focus::List);
    let block = Block::default()
        .title(format!(" Assignments ({}) ", app.messages.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_message_body(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    let (title, lines) = match app.selected_message() {
        Some(message) => {
            let mut lines: Vec<Line> = message.body.lines().map(Line::from).collect();
            lines.push(Line::from(""));
            let hint = if app.copied.contains(&app.selection) {
                Span::styled("Copied ✓  [c] copy again", styles::copied_style())
            } else {
                Span::styled("[c] copy to clipboard", styles::muted_style())
            };
            lines.push(Line::from(hint));
            (format!(" {} ", message.title), lines)
        }
        None => (" Message ".to_string(), vec![]),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));

    frame.render_widget(paragraph, area);
}
