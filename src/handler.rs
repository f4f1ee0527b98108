use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, FocusPane};
use crate::tui::{key_chord, AppEvent};

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => app.scroll_chat_to_bottom(),
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // The palette shortcut arrives through the global listener
    if let Some(chord) = key_chord(&key) {
        if app.assistant.palette().shortcut().matches(&chord) {
            return;
        }
    }

    if app.assistant.palette().is_visible() {
        handle_palette(app, key);
    } else {
        handle_page(app, key);
    }
}

/// Plain or shifted characters only; chords with Ctrl, Alt or Super are
/// never typed.
fn is_typed(key: &KeyEvent) -> bool {
    !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
}

fn handle_page(app: &mut App, key: KeyEvent) {
    if !is_typed(&key) {
        return;
    }
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('a') | KeyCode::Enter => app.open_palette(),
        KeyCode::Char('s') => app.assistant.silence_alarm(),
        _ => {}
    }
}

fn handle_palette(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.assistant.palette_mut().close();
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_focus();
            return;
        }
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.assistant.silence_alarm();
            return;
        }
        _ => {}
    }

    match app.focus {
        FocusPane::Input => handle_input(app, key),
        FocusPane::Commands => handle_commands(app, key),
    }
}

fn handle_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Char(c) if is_typed(&key) => app.assistant.palette_mut().insert_char(c),
        KeyCode::Backspace => app.assistant.palette_mut().backspace(),
        KeyCode::Delete => app.assistant.palette_mut().delete(),
        KeyCode::Left => app.assistant.palette_mut().cursor_left(),
        KeyCode::Right => app.assistant.palette_mut().cursor_right(),
        KeyCode::Home => app.assistant.palette_mut().cursor_home(),
        KeyCode::End => app.assistant.palette_mut().cursor_end(),
        KeyCode::Up => app.scroll_chat_up(1),
        KeyCode::Down => app.scroll_chat_down(1),
        KeyCode::PageUp => app.scroll_chat_up(10),
        KeyCode::PageDown => app.scroll_chat_down(10),
        _ => {}
    }
}

fn handle_commands(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.pick_selected(),
        KeyCode::Up => app.assistant.palette_mut().select_prev(),
        KeyCode::Down => app.assistant.palette_mut().select_next(),
        KeyCode::Backspace => app.assistant.palette_mut().pop_query_char(),
        KeyCode::Char(c) if is_typed(&key) => app.assistant.palette_mut().push_query_char(c),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if !app.assistant.palette().is_visible() {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_chat_down(3),
        MouseEventKind::ScrollUp => app.scroll_chat_up(3),
        _ => {}
    }
}
