use std::sync::Arc;

use anyhow::Result;
use safeguard_core::Config;

mod app;
mod handler;
mod logging;
mod shell;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, TerminalInput};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if let Err(err) = logging::init() {
        eprintln!("warning: logging disabled: {err}");
    }

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "falling back to default configuration");
        Config::default()
    });
    tracing::info!(
        reply_delay_ms = config.reply_delay_ms,
        alarm = config.alarm_kind.as_str(),
        "starting SafeGuard assistant"
    );

    tui::install_panic_hook();

    let input = Arc::new(TerminalInput::default());
    let mut app = App::new(&config, input.clone());
    let mut events = EventHandler::new(input);
    let mut terminal = tui::init()?;

    let result = run(&mut app, &mut terminal, &mut events).await;

    tui::restore()?;
    result
}

async fn run(app: &mut App, terminal: &mut tui::Tui, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
        app.update();
    }
    Ok(())
}
