use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};
use safeguard_core::{CommandKind, Role, ToastVariant};

use crate::app::{App, FocusPane};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_page(app, frame, body_area);
    render_footer(app, frame, footer_area);

    if app.assistant.palette().is_visible() {
        render_palette(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let shell = app.shell.snapshot();

    let session = if shell.signed_in {
        Span::styled(" signed in ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" signed out ", Style::default().fg(Color::DarkGray))
    };

    let mut spans = vec![
        Span::styled(" SafeGuard ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("{} ", shell.route.path()),
            Style::default().fg(Color::White),
        ),
        session,
    ];
    if let Some(kind) = shell.alarm {
        spans.push(Span::styled(
            format!(" ALARM: {} ", kind.as_str()),
            Style::default().bg(Color::Red).fg(Color::White).bold(),
        ));
    }
    spans.push(Span::styled(
        format!(" v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::DarkGray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_page(app: &App, frame: &mut Frame, area: Rect) {
    let shell = app.shell.snapshot();

    let [page_area, toast_area] = Layout::horizontal([
        Constraint::Percentage(60),
        Constraint::Percentage(40),
    ])
    .areas(area);

    let page_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", shell.route.display_name()));

    let page_text = if shell.route.is_protected() && !shell.signed_in {
        Text::from(vec![
            Line::from(Span::styled(
                "Sign in required",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from("This page is only available to signed-in users."),
        ])
    } else {
        Text::from(vec![
            Line::from(Span::styled(
                shell.route.display_name(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                format!("Press {} or a to ask the assistant.", shortcut_label(app)),
                Style::default().fg(Color::DarkGray),
            )),
        ])
    };

    frame.render_widget(
        Paragraph::new(page_text).block(page_block).wrap(Wrap { trim: true }),
        page_area,
    );

    let toast_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Notifications ");

    let items: Vec<ListItem> = shell
        .toasts
        .iter()
        .rev()
        .map(|toast| {
            let title_style = match toast.variant {
                ToastVariant::Destructive => Style::default().fg(Color::Red).bold(),
                ToastVariant::Default => Style::default().fg(Color::Green).bold(),
            };
            ListItem::new(Text::from(vec![
                Line::from(Span::styled(toast.title.clone(), title_style)),
                Line::from(Span::styled(
                    toast.description.clone(),
                    Style::default().fg(Color::Gray),
                )),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(toast_block), toast_area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hints = if !app.assistant.palette().is_visible() {
        format!(" {}/a: assistant | s: silence alarm | q: quit ", shortcut_label(app))
    } else {
        match app.focus {
            FocusPane::Input => {
                " Enter: send | Tab: commands | Up/Down: scroll | Ctrl+S: silence | Esc: close ".to_string()
            }
            FocusPane::Commands => {
                " type to filter | Up/Down: select | Enter: run | Tab: chat | Esc: close ".to_string()
            }
        }
    };

    let footer = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, area);
}

fn shortcut_label(app: &App) -> String {
    format!("Ctrl+{}", app.assistant.palette().shortcut().key.to_ascii_uppercase())
}

fn render_palette(app: &mut App, frame: &mut Frame, area: Rect) {
    // Calculate popup size and position (centered)
    let popup_width = 80.min(area.width.saturating_sub(4));
    let popup_height = 24.min(area.height.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let [chat_column, commands_area] = Layout::horizontal([
        Constraint::Percentage(60),
        Constraint::Percentage(40),
    ])
    .areas(popup_area);

    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(chat_column);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_commands(app, frame, commands_area);
}

fn render_transcript(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Input;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" SafeGuard Assistant ");

    let mut lines: Vec<Line> = Vec::new();
    for msg in app.assistant.transcript() {
        let (label, color) = match msg.role {
            Role::User => ("You:", Color::Cyan),
            Role::Assistant => ("Assistant:", Color::Yellow),
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(msg.content.as_str()));
        lines.push(Line::default());
    }

    if app.assistant.pending_state().is_pending() {
        lines.push(Line::from(Span::styled(
            "Assistant:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.assistant.palette();
    let focused = app.focus == FocusPane::Input;

    let (title, border_color) = if !app.assistant.can_submit() {
        (" Waiting for reply... ", Color::DarkGray)
    } else if focused {
        (" Ask anything (Enter to send) ", Color::Yellow)
    } else {
        (" Ask anything ", Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let input = if palette.input().is_empty() && !focused {
        Paragraph::new(Span::styled(
            "Type a message...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(palette.input())
    };
    frame.render_widget(input.block(block), area);

    if focused {
        let inner_width = area.width.saturating_sub(2);
        let cursor = (palette.cursor() as u16).min(inner_width.saturating_sub(1));
        frame.set_cursor_position((area.x + 1 + cursor, area.y + 1));
    }
}

fn render_commands(app: &mut App, frame: &mut Frame, area: Rect) {
    let palette = app.assistant.palette();
    let focused = app.focus == FocusPane::Commands;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let title = if palette.query().is_empty() {
        " Commands ".to_string()
    } else {
        format!(" Commands: {} ", palette.query())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let commands = palette.commands();
    if commands.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No commands found.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Group headings take rows too, so map the selection onto display rows
    let mut items: Vec<ListItem> = Vec::new();
    let mut selected_row = None;
    let selected = palette.selected_index();
    for kind in [CommandKind::Navigation, CommandKind::Action] {
        let group: Vec<_> = commands
            .iter()
            .enumerate()
            .filter(|(_, command)| command.kind() == kind)
            .collect();
        if group.is_empty() {
            continue;
        }
        items.push(ListItem::new(Line::from(Span::styled(
            kind.heading(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        ))));
        for (index, command) in group {
            if Some(index) == selected {
                selected_row = Some(items.len());
            }
            let name_style = match kind {
                CommandKind::Action => Style::default().fg(Color::Red),
                CommandKind::Navigation => Style::default(),
            };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(command.name, name_style),
                Span::styled(
                    format!("  {}", command.description),
                    Style::default().fg(Color::DarkGray),
                ),
            ])));
        }
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(if focused {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        })
        .highlight_symbol("> ");

    app.command_state.select(selected_row);
    frame.render_stateful_widget(list, area, &mut app.command_state);
}
