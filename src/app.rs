use std::sync::Arc;

use ratatui::widgets::ListState;
use safeguard_core::{Assistant, Config, GlobalInput};

use crate::shell::Shell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Input,
    Commands,
}

pub struct App {
    pub should_quit: bool,
    pub assistant: Assistant,
    pub shell: Shell,

    // Palette view state
    pub focus: FocusPane,
    pub command_state: ListState,
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the transcript area, set during render
    pub chat_width: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(config: &Config, input: Arc<dyn GlobalInput>) -> Self {
        let shell = Shell::new();
        let mut assistant = Assistant::new(config, shell.collaborators());
        assistant.mount(input);

        Self {
            should_quit: false,
            assistant,
            shell,
            focus: FocusPane::Input,
            command_state: ListState::default(),
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
        }
    }

    /// Called after every event: applies shortcut presses and lands a
    /// finished reply.
    pub fn update(&mut self) {
        let was_visible = self.assistant.palette().is_visible();
        if let Some(reply) = self.assistant.poll() {
            tracing::debug!(intent = ?reply.intent, "assistant reply delivered");
            self.scroll_chat_to_bottom();
        }
        if !was_visible && self.assistant.palette().is_visible() {
            self.focus = FocusPane::Input;
            self.scroll_chat_to_bottom();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.assistant.pending_state().is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn open_palette(&mut self) {
        self.assistant.palette_mut().open();
        self.focus = FocusPane::Input;
        self.scroll_chat_to_bottom();
    }

    pub fn submit_input(&mut self) {
        if !self.assistant.can_submit() {
            return;
        }
        match self.assistant.submit_input() {
            Ok(intent) => tracing::debug!(?intent, "submitted"),
            Err(rejected) => tracing::debug!(%rejected, "submission ignored"),
        }
        self.scroll_chat_to_bottom();
    }

    pub fn pick_selected(&mut self) {
        if let Some(command) = self.assistant.pick_selected() {
            tracing::debug!(command = command.name, "command picked");
            self.focus = FocusPane::Input;
            self.assistant.palette_mut().clear_query();
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Input => FocusPane::Commands,
            FocusPane::Commands => FocusPane::Input,
        };
    }

    /// Scroll the transcript so the newest message (or "Thinking...") is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: usize = 0;
        for msg in self.assistant.transcript() {
            // Label, wrapped body (by character count, not bytes), blank line
            let body = msg.content.chars().count() / wrap_width + 1;
            total_lines = total_lines.saturating_add(body + 2);
        }
        if self.assistant.pending_state().is_pending() {
            total_lines = total_lines.saturating_add(2);
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            10
        };
        self.chat_scroll = u16::try_from(total_lines)
            .unwrap_or(u16::MAX)
            .saturating_sub(visible_height);
    }

    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_chat_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safeguard_core::testing::InMemoryInput;
    use safeguard_core::{KeyChord, PendingState, Route};

    fn app(input: &Arc<InMemoryInput>) -> App {
        let config = Config {
            reply_delay_ms: 10,
            ..Config::default()
        };
        App::new(&config, input.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn shortcut_opens_palette_on_update() {
        let input = Arc::new(InMemoryInput::new());
        let mut app = app(&input);
        assert_eq!(input.listener_count(), 1);

        input.press(KeyChord::ctrl('k'));
        app.update();
        assert!(app.assistant.palette().is_visible());
        assert_eq!(app.focus, FocusPane::Input);
    }

    #[tokio::test(start_paused = true)]
    async fn reply_lands_and_navigation_reaches_the_shell() {
        let input = Arc::new(InMemoryInput::new());
        let mut app = app(&input);
        app.open_palette();
        app.assistant.palette_mut().insert_str("safety score");
        app.submit_input();
        assert_eq!(app.assistant.pending_state(), PendingState::Pending);
        assert_eq!(app.shell.snapshot().route, Route::SafetyScore);

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        app.update();
        assert_eq!(app.assistant.pending_state(), PendingState::Idle);
        assert_eq!(app.assistant.transcript().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn picking_sos_rings_and_closes() {
        let input = Arc::new(InMemoryInput::new());
        let mut app = app(&input);
        app.open_palette();
        app.toggle_focus();
        for c in "sos".chars() {
            app.assistant.palette_mut().push_query_char(c);
        }
        app.pick_selected();

        let shell = app.shell.snapshot();
        assert!(!app.assistant.palette().is_visible());
        assert!(shell.alarm.is_some());
        assert_eq!(shell.toasts.len(), 1);
        assert_eq!(app.focus, FocusPane::Input);
        app.assistant.silence_alarm();
        assert_eq!(app.shell.snapshot().alarm, None);
    }

    #[tokio::test(start_paused = true)]
    async fn long_session_scroll_saturates() {
        let input = Arc::new(InMemoryInput::new());
        let config = Config {
            reply_delay_ms: 0,
            ..Config::default()
        };
        let mut app = App::new(&config, input.clone());
        app.chat_width = 20;
        app.chat_height = 10;

        // Each turn is well over ten wrapped lines, so this passes u16::MAX
        for _ in 0..4000 {
            app.assistant.submit("help").unwrap();
            app.assistant.next_reply().await.unwrap();
        }
        app.scroll_chat_to_bottom();
        assert_eq!(app.assistant.transcript().len(), 8001);
        assert_eq!(app.chat_scroll, u16::MAX - 10);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_app_releases_the_shortcut() {
        let input = Arc::new(InMemoryInput::new());
        let app = app(&input);
        drop(app);
        assert_eq!(input.listener_count(), 0);
    }
}
