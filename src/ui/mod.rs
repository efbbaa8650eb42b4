//! User interface components.
//!
//! Provides the drawing functions for the terminal editor using ratatui.

mod editor;

pub use editor::draw_editor;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::constants::ui;
use crate::input::AppMode;
use crate::services::editor::Editor;

/// Render the full application UI to the terminal frame.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(ui::STATUS_BAR_HEIGHT),
        ])
        .split(f.size());

    draw_editor(f, app, chunks[0]);
    draw_command_bar(f, app, chunks[1]);

    if app.show_help {
        draw_help_modal(f);
    }
}

fn draw_command_bar(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled("Commands/Status", Style::default().fg(Color::Yellow)));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let (line, col) = app.buffer.cursor_position();
    let position = format!(
        "Ln {}, Col {} | Wrap: {} | Tab: {} | {}",
        line + 1,
        col + 1,
        app.wrap_column,
        app.tab_width,
        if app.minimum_raggedness { "Min raggedness" } else { "Greedy" },
    );

    let mut text = match (&app.status_message, app.mode) {
        (_, AppMode::Command) => create_help_text(&[("Enter", "Run"), ("Esc", "Cancel")]),
        (Some(message), AppMode::Editor) => {
            vec![Span::raw(" "), Span::styled(message.clone(), Style::default().fg(Color::Cyan))]
        }
        (None, AppMode::Editor) => create_help_text(&[
            ("Alt+Q", "Wrap paragraph"),
            ("Ctrl+W", "Wrap selection"),
            ("Esc", "Command"),
            ("F1", "Help"),
        ]),
    };
    text.push(Span::styled(format!(" | {position}"), Style::default().fg(Color::Gray)));

    f.render_widget(Paragraph::new(Line::from(text)).style(Style::default().fg(Color::Gray)), inner_area);
}

/// Build styled help text spans from key-description pairs for the command bar.
pub fn create_help_text<'a>(commands: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut text = vec![Span::raw(" ")]; // Start with padding

    for (i, (key, description)) in commands.iter().enumerate() {
        text.push(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
        text.push(Span::raw(format!(": {description}")));

        if i < commands.len() - 1 {
            text.push(Span::raw(" | "));
        }
    }

    text
}

// Draw the help modal with keybindings
fn draw_help_modal(f: &mut Frame) {
    let size = f.size();

    let width = 60.min(size.width.saturating_sub(4));
    let height = 26.min(size.height.saturating_sub(4));

    let area = Rect {
        x: (size.width.saturating_sub(width)) / 2,
        y: (size.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let block = Block::default()
        .title(Span::styled(" Help - Keybindings ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let inner_area = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let help_text: Vec<Line> = HELP
        .iter()
        .map(|(key, desc, is_header)| {
            if *is_header {
                Line::from(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)))
            } else {
                Line::from(vec![
                    Span::styled(format!("{key:>14}"), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(*desc, Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    f.render_widget(Paragraph::new(help_text).wrap(Wrap { trim: true }), inner_area);
}

const HELP: &[(&str, &str, bool)] = &[
    ("── Editor ──", "", true),
    ("Arrows", "Move cursor", false),
    ("Shift+Arrows", "Select text", false),
    ("Alt+Q", "Wrap paragraph or selection", false),
    ("Ctrl+W", "Wrap selection or line", false),
    ("Alt+[ / Alt+]", "Move wrap column", false),
    ("Ctrl+Y", "Copy selection or line", false),
    ("Ctrl+S", "Save", false),
    ("Ctrl+Q", "Quit", false),
    ("Esc", "Command line", false),
    ("", "", false),
    ("── Commands ──", "", true),
    (":w / :wq", "Save / save and quit", false),
    (":q / :q!", "Quit / discard changes", false),
    (":wrap", "Wrap paragraph", false),
    (":wrap N", "Set wrap column", false),
    (":ragged on|off", "Minimum raggedness", false),
    (":tab N", "Set tab width", false),
    (":settings save", "Store current settings", false),
    ("", "", false),
    ("Any key", "Close this help", false),
];
