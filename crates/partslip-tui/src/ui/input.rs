//! Keyboard input handling for the TUI.
//!
//! Translates key events into application state changes. Overlays take
//! input first, then the focused panel.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Focus, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::EnteringUrl => {
            handle_url_input(app, key);
            return false;
        }
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return false;
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return true;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return false;
        }
        AppState::Quitting => return true,
        AppState::Normal => {}
    }

    // A status message lasts until the next key press
    app.clear_status();

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return false;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return false;
        }
        KeyCode::Char('o') => {
            app.start_url_entry();
            return false;
        }
        KeyCode::Char('u') => {
            app.reload();
            return false;
        }
        KeyCode::Char('c') | KeyCode::Enter => {
            app.copy_selected();
            return false;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_focus();
            return false;
        }
        _ => {}
    }

    match app.focus {
        Focus::List => handle_list_input(app, key),
        Focus::Detail => handle_detail_input(app, key),
    }
    false
}

fn handle_list_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(1),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(1),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Right | KeyCode::Char('l') => app.focus = Focus::Detail,
        _ => {}
    }
}

fn handle_detail_input(app: &mut App, key: KeyEvent) {
    let page = PAGE_SCROLL_SIZE as u16;
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.detail_scroll = app.detail_scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.detail_scroll = app.detail_scroll.saturating_add(1);
        }
        KeyCode::PageUp => app.detail_scroll = app.detail_scroll.saturating_sub(page),
        KeyCode::PageDown => app.detail_scroll = app.detail_scroll.saturating_add(page),
        KeyCode::Home => app.detail_scroll = 0,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Esc => app.focus = Focus::List,
        _ => {}
    }
}

fn handle_url_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_url_entry(),
        KeyCode::Enter => app.submit_url(),
        KeyCode::Backspace => {
            app.url_input.pop();
        }
        KeyCode::Char(c) => app.push_url_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::KeyModifiers;
    use partslip_core::load_text;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn loaded_app() -> App {
        let mut app = App::new(Config::default()).expect("app builds");
        app.config_path = None;
        let schedule = load_text(
            "JANUARY 5-11,JANUARY 12-18\n3 A,4 B / C\n5 D,6 E\n",
            &app.config.load_options(),
        )
        .expect("loads");
        app.apply_schedule(schedule);
        app
    }

    #[test]
    fn test_quit_requires_confirmation() {
        let mut app = loaded_app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_list_navigation() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selection, 2);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selection, 1);
        press(&mut app, KeyCode::End);
        assert_eq!(app.selection, 3);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.selection, 0);
    }

    #[test]
    fn test_detail_focus_scrolls_instead_of_selecting() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Detail);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.detail_scroll, 2);
        assert_eq!(app.selection, 0);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::List);
    }

    #[test]
    fn test_copy_key_marks_message() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('c'));
        assert!(app.copied.contains(&0));
        assert!(app.take_pending_copy().is_some());
    }

    #[test]
    fn test_esc_discards_url_edit() {
        let mut app = loaded_app();
        app.url_input = "https://example.com/exec".to_string();
        press(&mut app, KeyCode::Char('o'));
        for _ in 0..8 {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.url_input, "https://example.z");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.url_input, "https://example.com/exec");
    }

    #[test]
    fn test_key_press_clears_status_message() {
        let mut app = loaded_app();
        assert_eq!(app.status_text(), "Loaded 4 assignments");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.status_text(), "4 assignments loaded just now");

        press(&mut app, KeyCode::Char('c'));
        assert!(app.status_text().starts_with("Copied to clipboard"));
    }

    #[test]
    fn test_url_overlay_captures_keys() {
        let mut app = loaded_app();
        app.url_input.clear();
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.state, AppState::EnteringUrl);

        // 'q' is text here, not quit
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.url_input, "q");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_help_overlay_toggles() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::ShowingHelp);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selection, 0);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
    }
}
