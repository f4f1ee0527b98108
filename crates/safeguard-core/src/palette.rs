use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::collaborators::{GlobalInput, KeyChord, ListenerId};
use crate::registry::{Command, CommandRegistry};
use crate::state::PendingState;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Modifier + key that toggles the palette. Either Ctrl or Super counts
/// as the modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: char,
}

impl Default for Shortcut {
    fn default() -> Self {
        Self { key: 'k' }
    }
}

impl Shortcut {
    pub fn matches(&self, chord: &KeyChord) -> bool {
        (chord.control || chord.super_key) && !chord.alt && chord.key.eq_ignore_ascii_case(&self.key)
    }
}

/// A live subscription to the global key source. Dropping it removes the
/// listener.
pub struct ShortcutBinding {
    input: Arc<dyn GlobalInput>,
    id: ListenerId,
    receiver: UnboundedReceiver<KeyChord>,
}

impl ShortcutBinding {
    pub fn bind(input: Arc<dyn GlobalInput>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = input.add_listener(sender);
        tracing::debug!(listener = id.0, "palette shortcut bound");
        Self {
            input,
            id,
            receiver,
        }
    }

    fn drain(&mut self) -> Vec<KeyChord> {
        let mut chords = Vec::new();
        while let Ok(chord) = self.receiver.try_recv() {
            chords.push(chord);
        }
        chords
    }
}

impl Drop for ShortcutBinding {
    fn drop(&mut self) {
        self.input.remove_listener(self.id);
        tracing::debug!(listener = self.id.0, "palette shortcut released");
    }
}

/// Overlay visibility, the chat input line and the command list selection.
#[derive(Debug, Default)]
pub struct Palette {
    visible: bool,
    shortcut: Shortcut,
    input: String,
    cursor: usize, // character position in `input`
    query: String,
    selected: usize,
}

impl Palette {
    pub fn new(shortcut: Shortcut) -> Self {
        Self {
            shortcut,
            ..Self::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn shortcut(&self) -> Shortcut {
        self.shortcut
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Toggle if `chord` is the activation shortcut.
    pub fn handle_chord(&mut self, chord: &KeyChord) -> bool {
        if self.shortcut.matches(chord) {
            self.toggle();
            true
        } else {
            false
        }
    }

    /// Apply every chord received since the last pump. Returns how many
    /// toggles happened.
    pub fn pump(&mut self, binding: &mut ShortcutBinding) -> usize {
        binding
            .drain()
            .iter()
            .filter(|chord| self.handle_chord(chord))
            .count()
    }

    pub fn can_submit(&self, state: PendingState) -> bool {
        !state.is_pending() && !self.input.trim().is_empty()
    }

    // Input line

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            self.insert_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    // Command list

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.selected = 0;
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.selected = 0;
    }

    pub fn commands(&self) -> Vec<&'static Command> {
        CommandRegistry::search(&self.query)
    }

    pub fn selected_index(&self) -> Option<usize> {
        let len = self.commands().len();
        if len == 0 {
            None
        } else {
            Some(self.selected.min(len - 1))
        }
    }

    pub fn selected_command(&self) -> Option<&'static Command> {
        self.selected_index().and_then(|i| self.commands().get(i).copied())
    }

    pub fn select_next(&mut self) {
        let len = self.commands().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::InMemoryInput;

    #[test]
    fn double_toggle_restores_visibility() {
        let mut palette = Palette::default();
        for start in [false, true] {
            if start {
                palette.open();
            }
            palette.handle_chord(&KeyChord::ctrl('k'));
            palette.handle_chord(&KeyChord::ctrl('k'));
            assert_eq!(palette.is_visible(), start);
        }
    }

    #[test]
    fn shortcut_needs_ctrl_or_super() {
        let shortcut = Shortcut::default();
        assert!(shortcut.matches(&KeyChord::ctrl('k')));
        assert!(shortcut.matches(&KeyChord::super_key('K')));
        assert!(!shortcut.matches(&KeyChord::plain('k')));
        assert!(!shortcut.matches(&KeyChord::ctrl('j')));
        let mut alt = KeyChord::ctrl('k');
        alt.alt = true;
        assert!(!shortcut.matches(&alt));
    }

    #[test]
    fn binding_registers_once_and_releases_on_drop() {
        let input = Arc::new(InMemoryInput::new());
        let binding = ShortcutBinding::bind(input.clone());
        assert_eq!(input.listener_count(), 1);
        drop(binding);
        assert_eq!(input.listener_count(), 0);

        let _remounted = ShortcutBinding::bind(input.clone());
        assert_eq!(input.listener_count(), 1);
    }

    #[test]
    fn pump_applies_received_shortcuts() {
        let input = Arc::new(InMemoryInput::new());
        let mut binding = ShortcutBinding::bind(input.clone());
        let mut palette = Palette::default();

        input.press(KeyChord::ctrl('k'));
        input.press(KeyChord::plain('x'));
        assert_eq!(palette.pump(&mut binding), 1);
        assert!(palette.is_visible());

        input.press(KeyChord::super_key('k'));
        input.press(KeyChord::ctrl('k'));
        assert_eq!(palette.pump(&mut binding), 2);
        assert!(palette.is_visible());
        assert_eq!(palette.pump(&mut binding), 0);
    }

    #[test]
    fn explicit_open_and_close_are_absolute() {
        let mut palette = Palette::default();
        palette.open();
        palette.open();
        assert!(palette.is_visible());
        palette.close();
        palette.close();
        assert!(!palette.is_visible());
    }

    #[test]
    fn submission_gate() {
        let mut palette = Palette::default();
        assert!(!palette.can_submit(PendingState::Idle));
        palette.insert_str("   ");
        assert!(!palette.can_submit(PendingState::Idle));
        palette.insert_str("sos");
        assert!(palette.can_submit(PendingState::Idle));
        assert!(!palette.can_submit(PendingState::Pending));
    }

    #[test]
    fn editing_is_utf8_safe() {
        let mut palette = Palette::default();
        palette.insert_str("héllo");
        palette.cursor_left();
        palette.cursor_left();
        palette.cursor_left();
        palette.backspace();
        assert_eq!(palette.input(), "hllo");
        palette.cursor_home();
        palette.delete();
        assert_eq!(palette.input(), "llo");
        palette.cursor_end();
        palette.insert_char('!');
        assert_eq!(palette.input(), "llo!");
        assert_eq!(palette.cursor(), 4);
        palette.clear_input();
        assert_eq!((palette.input(), palette.cursor()), ("", 0));
    }

    #[test]
    fn selection_follows_the_search_query() {
        let mut palette = Palette::default();
        assert_eq!(palette.selected_command().map(|c| c.name), Some("Home"));
        palette.select_next();
        palette.select_next();
        assert_eq!(palette.selected_command().map(|c| c.name), Some("Trusted Contacts"));

        for c in "log".chars() {
            palette.push_query_char(c);
        }
        assert_eq!(palette.selected_command().map(|c| c.name), Some("Log Out"));
        palette.select_next();
        assert_eq!(palette.selected_index(), Some(0));

        palette.clear_query();
        palette.push_query_char('q');
        assert_eq!(palette.selected_command(), None);
    }
}
