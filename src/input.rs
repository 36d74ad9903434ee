use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};

/// Handle a single key input event.
pub fn handle_input(app: &mut App, key: KeyEvent) {
    app.status = None;
    match app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Help => handle_help_mode(app, key),
    }
}

// ── Normal mode ─────────────────────────────────────────────────────────

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        // ── Quit ──
        KeyCode::F(10) | KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // ── Legend navigation ──
        KeyCode::Up => app.select_prev(),
        KeyCode::Down => app.select_next(),
        KeyCode::Char('k') => app.select_prev(),
        KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // ── Tab: CPU <-> MEM ──
        KeyCode::Tab | KeyCode::BackTab => app.switch_metric(),

        // ── Highlighting ──
        KeyCode::Char(' ') => app.toggle_highlight(),
        KeyCode::Char('U') => app.clear_highlights(),

        // ── Row window ──
        KeyCode::Left | KeyCode::Char('h') => app.pan_left(),
        KeyCode::Right | KeyCode::Char('l') => app.pan_right(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') => app.zoom_out(),
        KeyCode::Char('0') => app.reset_window(),

        // ── Display ──
        KeyCode::Char('c') => app.cycle_color_scheme(),
        KeyCode::Char('w') => app.save_requested = true,

        // ── Help ──
        KeyCode::F(1) | KeyCode::Char('?') => app.mode = AppMode::Help,

        _ => {}
    }
}

// ── Help popup ──────────────────────────────────────────────────────────

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
            app.mode = AppMode::Normal;
        }
        KeyCode::F(10) => app.should_quit = true,
        _ => {}
    }
}
