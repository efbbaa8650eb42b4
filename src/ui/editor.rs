use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, symbols,
};
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::input::AppMode;
use crate::services::editor::{Editor, Selection};

/// Draw the buffer with selection, paragraph highlight, wrap guide and caret.
#[allow(clippy::cast_possible_truncation)]
pub fn draw_editor(f: &mut Frame, app: &mut App, area: Rect) {
    let title = app.path.as_ref().map_or_else(
        || "[scratch]".to_string(),
        |p| format!("{}{}", p.display(), if app.dirty { " [+]" } else { "" }),
    );
    let editor_block = Block::default()
        .title(Span::styled(title, Style::default().fg(Color::Yellow)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    f.render_widget(editor_block.clone(), area);
    let inner_area = editor_block.inner(area);

    // Scrolling needs the real viewport height
    app.viewport_height = inner_area.height as usize;

    let lines = app.buffer.content();
    let start_line = app.scroll_offset.min(lines.len());
    let end_line = (start_line + inner_area.height as usize).min(lines.len());

    let paragraph_bounds = app.current_paragraph_bounds();
    let selection = app.selection();

    let styled_content: Vec<Line> = lines[start_line..end_line]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let y = start_line + i;
            let in_paragraph = paragraph_bounds.is_some_and(|(start, end)| (start..=end).contains(&y));
            let background = if in_paragraph { Color::Rgb(60, 60, 70) } else { Color::Reset };
            Line::from(style_editor_line(y, line, selection, background, app.wrap_column, app.tab_width))
        })
        .collect();

    f.render_widget(Paragraph::new(styled_content), inner_area);

    draw_wrap_guide(f, app.wrap_column, inner_area);

    if app.mode == AppMode::Editor {
        let (line, col) = app.buffer.cursor_position();
        let cursor_y = line.saturating_sub(app.scroll_offset);
        let cursor_x = lines.get(line).map_or(0, |l| display_column(l, col, app.tab_width));
        if cursor_y < inner_area.height as usize && cursor_x < inner_area.width as usize {
            f.set_cursor(inner_area.left() + cursor_x as u16, inner_area.top() + cursor_y as u16);
        }
    } else {
        let command_area = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner_area)[1];

        let command = Paragraph::new(format!(":{}", app.command_buffer)).style(Style::default().fg(Color::Yellow));
        f.render_widget(command, command_area);

        f.set_cursor(
            command_area.left() + app.command_buffer.chars().count() as u16 + 1,
            command_area.top(),
        );
    }
}

/// Split a line into spans: selected text, text past the wrap column, and the rest.
fn style_editor_line(
    y: usize,
    line: &str,
    selection: Option<Selection>,
    background: Color,
    wrap_column: usize,
    tab_width: usize,
) -> Vec<Span<'static>> {
    let base = Style::default().fg(Color::White).bg(background);
    let overflow = base.fg(Color::LightRed);
    let selected = Style::default().bg(Color::Rgb(80, 80, 120)).fg(Color::White);

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current = String::new();
    let mut current_style = base;
    let mut column = 0;

    for (i, c) in line.chars().enumerate() {
        let style = if selection.is_some_and(|s| contains(s, y, i)) {
            selected
        } else if column >= wrap_column {
            overflow
        } else {
            base
        };
        if style != current_style && !current.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut current), current_style));
        }
        current_style = style;

        let width = char_width(c, tab_width);
        if c == '\t' {
            current.extend(std::iter::repeat(' ').take(width));
        } else {
            current.push(c);
        }
        column += width;
    }

    // Selected line breaks show as a single highlighted cell
    let newline_selected = selection.is_some_and(|s| y >= s.start_line && y < s.end_line);
    if newline_selected {
        if !current.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut current), current_style));
        }
        spans.push(Span::styled(" ", selected));
    } else if !current.is_empty() || spans.is_empty() {
        spans.push(Span::styled(current, current_style));
    }
    spans
}

const fn contains(selection: Selection, y: usize, x: usize) -> bool {
    let after_start = y > selection.start_line || (y == selection.start_line && x >= selection.start_col);
    let before_end = y < selection.end_line || (y == selection.end_line && x < selection.end_col);
    after_start && before_end
}

fn char_width(c: char, tab_width: usize) -> usize {
    if c == '\t' {
        tab_width
    } else {
        c.width().unwrap_or(0)
    }
}

/// Screen column of the char at index `col`.
fn display_column(line: &str, col: usize, tab_width: usize) -> usize {
    line.chars().take(col).map(|c| char_width(c, tab_width)).sum()
}

#[allow(clippy::cast_possible_truncation)]
fn draw_wrap_guide(f: &mut Frame, wrap_col: usize, area: Rect) {
    // Only draw if wrap column is within visible area
    if wrap_col < area.width as usize {
        let x = area.left() + wrap_col as u16;
        for y in 0..area.height {
            let cell = f.buffer_mut().get_mut(x, area.top() + y);
            if cell.symbol() == " " {
                cell.set_symbol(symbols::line::VERTICAL).set_style(Style::default().fg(Color::DarkGray));
            } else {
                cell.set_style(Style::default().add_modifier(Modifier::UNDERLINED));
            }
        }
    }
}
