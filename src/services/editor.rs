//! Editor service trait, text buffer and wrap actions.
//!
//! This module provides abstractions for text editing operations, allowing
//! the editor logic and the wrap actions to be tested independently of the UI.

use crate::wrap::CodeWrapper;

/// Trait for text editing operations.
///
/// This trait abstracts the core editing functionality, allowing for
/// different implementations (e.g., single-line, multi-line, with undo).
/// Columns count `char`s.
pub trait Editor {
    /// Get the current content as lines.
    fn content(&self) -> &[String];

    /// Get the current cursor position (line, column).
    fn cursor_position(&self) -> (usize, usize);

    /// Set the cursor position.
    fn set_cursor(&mut self, line: usize, column: usize);

    /// Insert a character at the current cursor position.
    fn insert_char(&mut self, c: char);

    /// Insert a string at the current cursor position.
    fn insert_str(&mut self, s: &str);

    /// Delete the character before the cursor (backspace).
    fn delete_backward(&mut self);

    /// Delete the character at the cursor (delete).
    fn delete_forward(&mut self);

    /// Get the total number of lines.
    fn line_count(&self) -> usize {
        self.content().len()
    }
}

/// Selection range in the editor.
///
/// Columns count `char`s, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Start line (0-indexed).
    pub start_line: usize,
    /// Start column (0-indexed).
    pub start_col: usize,
    /// End line (0-indexed).
    pub end_line: usize,
    /// End column (0-indexed).
    pub end_col: usize,
}

impl Selection {
    /// Create a new selection.
    #[must_use]
    pub const fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Selection covering whole lines `start..=end`, given their contents.
    pub fn lines(content: &[String], start: usize, end: usize) -> Self {
        let end_col = content.get(end).map_or(0, |l| l.chars().count());
        Self::new(start, 0, end, end_col)
    }

    /// Normalize the selection so start comes before end.
    #[must_use]
    pub const fn normalized(&self) -> Self {
        if self.start_line > self.end_line
            || (self.start_line == self.end_line && self.start_col > self.end_col)
        {
            Self {
                start_line: self.end_line,
                start_col: self.end_col,
                end_line: self.start_line,
                end_col: self.start_col,
            }
        } else {
            *self
        }
    }

    /// Check if the selection is empty (zero length).
    pub const fn is_empty(&self) -> bool {
        self.start_line == self.end_line && self.start_col == self.end_col
    }
}

/// Line-based text buffer with a caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor_line: usize,
    cursor_col: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self { lines: vec![String::new()], cursor_line: 0, cursor_col: 0 }
    }
}

impl TextBuffer {
    /// Create a buffer from text. A trailing newline becomes a trailing empty line.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            cursor_line: 0,
            cursor_col: 0,
        }
    }

    /// The full buffer text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Length of a line in chars, or 0 past the end.
    pub fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.chars().count())
    }

    /// Text covered by `selection`, lines joined with `\n`.
    pub fn text_in(&self, selection: Selection) -> String {
        let sel = self.clamp(selection.normalized());
        if sel.start_line == sel.end_line {
            return char_slice(&self.lines[sel.start_line], sel.start_col, sel.end_col).to_string();
        }

        let mut parts = Vec::with_capacity(sel.end_line - sel.start_line + 1);
        parts.push(char_slice(&self.lines[sel.start_line], sel.start_col, usize::MAX));
        for line in &self.lines[sel.start_line + 1..sel.end_line] {
            parts.push(line.as_str());
        }
        parts.push(char_slice(&self.lines[sel.end_line], 0, sel.end_col));
        parts.join("\n")
    }

    /// Replace the text covered by `selection` and move the caret to the end
    /// of the replacement. Returns the inserted line range.
    pub fn replace(&mut self, selection: Selection, text: &str) -> (usize, usize) {
        let sel = self.clamp(selection.normalized());
        let prefix = char_slice(&self.lines[sel.start_line], 0, sel.start_col).to_string();
        let suffix = char_slice(&self.lines[sel.end_line], sel.end_col, usize::MAX).to_string();

        let combined = format!("{prefix}{text}{suffix}");
        let new_lines: Vec<String> = combined.split('\n').map(str::to_string).collect();
        let last_line = sel.start_line + new_lines.len() - 1;
        self.lines.splice(sel.start_line..=sel.end_line, new_lines);

        let inserted_last = text.rsplit('\n').next().unwrap_or_default().chars().count();
        self.cursor_line = last_line;
        self.cursor_col = if text.contains('\n') {
            inserted_last
        } else {
            sel.start_col + inserted_last
        };
        (sel.start_line, last_line)
    }

    fn clamp(&self, sel: Selection) -> Selection {
        let last = self.lines.len().saturating_sub(1);
        let start_line = sel.start_line.min(last);
        let end_line = sel.end_line.min(last);
        Selection::new(
            start_line,
            sel.start_col.min(self.line_len(start_line)),
            end_line,
            sel.end_col.min(self.line_len(end_line)),
        )
    }
}

impl Editor for TextBuffer {
    fn content(&self) -> &[String] {
        &self.lines
    }

    fn cursor_position(&self) -> (usize, usize) {
        (self.cursor_line, self.cursor_col)
    }

    fn set_cursor(&mut self, line: usize, column: usize) {
        self.cursor_line = line.min(self.lines.len().saturating_sub(1));
        self.cursor_col = column.min(self.line_len(self.cursor_line));
    }

    fn insert_char(&mut self, c: char) {
        let (line, col) = (self.cursor_line, self.cursor_col);
        let at = byte_index(&self.lines[line], col);
        if c == '\n' {
            let tail = self.lines[line].split_off(at);
            self.lines.insert(line + 1, tail);
            self.cursor_line += 1;
            self.cursor_col = 0;
        } else {
            self.lines[line].insert(at, c);
            self.cursor_col += 1;
        }
    }

    fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert_char(c);
        }
    }

    fn delete_backward(&mut self) {
        let (line, col) = (self.cursor_line, self.cursor_col);
        if col > 0 {
            let at = byte_index(&self.lines[line], col - 1);
            self.lines[line].remove(at);
            self.cursor_col -= 1;
        } else if line > 0 {
            let current = self.lines.remove(line);
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
            self.lines[self.cursor_line].push_str(&current);
        }
    }

    fn delete_forward(&mut self) {
        let (line, col) = (self.cursor_line, self.cursor_col);
        if col < self.line_len(line) {
            let at = byte_index(&self.lines[line], col);
            self.lines[line].remove(at);
        } else if line + 1 < self.lines.len() {
            let next = self.lines.remove(line + 1);
            self.lines[line].push_str(&next);
        }
    }
}

/// Result of a wrap action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapOutcome {
    /// Text was replaced; the wrapped lines now span `first..=last`.
    Wrapped {
        /// First line of the wrapped text.
        first: usize,
        /// Last line of the wrapped text.
        last: usize,
    },
    /// Nothing to wrap, or wrapping changed nothing.
    Unchanged,
}

/// Wrap the selection, or the caret's line when nothing is selected.
///
/// Blank text is left alone.
pub fn wrap_selection(
    buffer: &mut TextBuffer,
    selection: Option<Selection>,
    wrapper: &CodeWrapper,
) -> WrapOutcome {
    let range = selection.filter(|s| !s.is_empty()).unwrap_or_else(|| {
        let (line, _) = buffer.cursor_position();
        Selection::lines(buffer.content(), line, line)
    });
    replace_wrapped(buffer, range, wrapper)
}

/// Wrap the paragraph around the caret, or the selection if there is one.
///
/// The paragraph grows up and down from the caret line until a line whose
/// text after the indent is blank. Nothing happens when the caret line
/// itself is blank.
pub fn wrap_paragraph_at_cursor(
    buffer: &mut TextBuffer,
    selection: Option<Selection>,
    wrapper: &CodeWrapper,
) -> WrapOutcome {
    if let Some(selection) = selection.filter(|s| !s.is_empty()) {
        return replace_wrapped(buffer, selection, wrapper);
    }

    let (line, _) = buffer.cursor_position();
    let Some((start, end)) = paragraph_bounds(buffer.content(), line, wrapper) else {
        return WrapOutcome::Unchanged;
    };
    let range = Selection::lines(buffer.content(), start, end);
    replace_wrapped(buffer, range, wrapper)
}

/// Line range of the paragraph containing `line`, or `None` if that line
/// holds nothing but an indent.
pub fn paragraph_bounds(lines: &[String], line: usize, wrapper: &CodeWrapper) -> Option<(usize, usize)> {
    let is_blank = |i: usize| wrapper.split_on_indent(&lines[i]).rest.trim().is_empty();

    if line >= lines.len() || is_blank(line) {
        return None;
    }

    let mut start = line;
    while start > 0 && !is_blank(start - 1) {
        start -= 1;
    }

    let mut end = line;
    while end + 1 < lines.len() && !is_blank(end + 1) {
        end += 1;
    }

    Some((start, end))
}

fn replace_wrapped(buffer: &mut TextBuffer, range: Selection, wrapper: &CodeWrapper) -> WrapOutcome {
    let text = buffer.text_in(range);
    if text.trim().is_empty() {
        return WrapOutcome::Unchanged;
    }

    let wrapped = wrapper.wrap(&text);
    if wrapped == text {
        return WrapOutcome::Unchanged;
    }

    let (first, last) = buffer.replace(range, &wrapped);
    tracing::debug!("Wrapped lines {first}..={last}");
    WrapOutcome::Wrapped { first, last }
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}

fn char_slice(line: &str, start: usize, end: usize) -> &str {
    let from = byte_index(line, start);
    let to = byte_index(line, end);
    &line[from..to.max(from)]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn narrow() -> CodeWrapper {
        CodeWrapper::builder().width(20).build().unwrap()
    }

    #[test]
    fn test_selection_normalized() {
        // Already normalized
        let sel = Selection::new(0, 5, 1, 10);
        let norm = sel.normalized();
        assert_eq!(norm.start_line, 0);
        assert_eq!(norm.end_line, 1);

        // Needs normalization (end before start)
        let sel = Selection::new(1, 10, 0, 5);
        let norm = sel.normalized();
        assert_eq!(norm.start_line, 0);
        assert_eq!(norm.start_col, 5);
        assert_eq!(norm.end_line, 1);
        assert_eq!(norm.end_col, 10);
    }

    #[test]
    fn test_selection_is_empty() {
        let empty = Selection::new(5, 10, 5, 10);
        assert!(empty.is_empty());

        let not_empty = Selection::new(5, 10, 5, 11);
        assert!(!not_empty.is_empty());
    }

    #[test]
    fn buffer_round_trips_text() {
        let text = "one\ntwo\n";
        assert_eq!(TextBuffer::from_text(text).text(), text);
    }

    #[test]
    fn text_in_spans_lines() {
        let buffer = TextBuffer::from_text("alpha\nbeta\ngamma");
        assert_eq!(buffer.text_in(Selection::new(0, 2, 2, 3)), "pha\nbeta\ngam");
        assert_eq!(buffer.text_in(Selection::new(1, 1, 1, 3)), "et");
    }

    #[test]
    fn replace_moves_cursor_to_end_of_insert() {
        let mut buffer = TextBuffer::from_text("alpha\nbeta");
        let range = buffer.replace(Selection::new(0, 1, 1, 2), "X\nYZ");
        assert_eq!(range, (0, 1));
        assert_eq!(buffer.text(), "aX\nYZta");
        assert_eq!(buffer.cursor_position(), (1, 2));
    }

    #[test]
    fn editing_handles_multibyte_chars() {
        let mut buffer = TextBuffer::from_text("héllo");
        buffer.set_cursor(0, 2);
        buffer.delete_backward();
        assert_eq!(buffer.text(), "hllo");
        buffer.insert_char('\n');
        assert_eq!(buffer.text(), "h\nllo");
        buffer.delete_backward();
        assert_eq!(buffer.text(), "hllo");
        buffer.delete_forward();
        assert_eq!(buffer.text(), "hlo");
    }

    #[test]
    fn wrap_selection_defaults_to_caret_line() {
        let mut buffer = TextBuffer::from_text("// one two three four five\n// keep");
        let outcome = wrap_selection(&mut buffer, None, &narrow());
        assert_eq!(outcome, WrapOutcome::Wrapped { first: 0, last: 1 });
        assert_eq!(buffer.text(), "// one two three\n// four five\n// keep");
    }

    #[test]
    fn wrap_selection_ignores_blank_text() {
        let mut buffer = TextBuffer::from_text("   \nword");
        assert_eq!(wrap_selection(&mut buffer, None, &narrow()), WrapOutcome::Unchanged);
        assert_eq!(buffer.text(), "   \nword");
    }

    #[test]
    fn paragraph_bounds_stop_at_comment_only_lines() {
        let lines: Vec<String> = ["//", "// a", "// b", "//", "// c"].iter().map(ToString::to_string).collect();
        let wrapper = CodeWrapper::default();
        assert_eq!(paragraph_bounds(&lines, 2, &wrapper), Some((1, 2)));
        assert_eq!(paragraph_bounds(&lines, 4, &wrapper), Some((4, 4)));
        assert_eq!(paragraph_bounds(&lines, 3, &wrapper), None);
    }

    #[test]
    fn wrap_paragraph_joins_surrounding_lines() {
        let mut buffer = TextBuffer::from_text("# intro\n\n# one two\n# three four\n# five\n\n# outro");
        buffer.set_cursor(3, 0);
        let outcome = wrap_paragraph_at_cursor(&mut buffer, None, &narrow());
        assert_eq!(outcome, WrapOutcome::Wrapped { first: 2, last: 3 });
        assert_eq!(buffer.text(), "# intro\n\n# one two three four\n# five\n\n# outro");
    }

    #[test]
    fn wrap_paragraph_on_blank_line_does_nothing() {
        let mut buffer = TextBuffer::from_text("# a\n#\n# b");
        buffer.set_cursor(1, 0);
        assert_eq!(wrap_paragraph_at_cursor(&mut buffer, None, &narrow()), WrapOutcome::Unchanged);
    }

    #[test]
    fn wrap_paragraph_prefers_selection() {
        let mut buffer = TextBuffer::from_text("a b\nc d\ne f");
        let selection = Selection::lines(buffer.content(), 0, 1);
        let outcome = wrap_paragraph_at_cursor(&mut buffer, Some(selection), &narrow());
        assert_eq!(outcome, WrapOutcome::Wrapped { first: 0, last: 0 });
        assert_eq!(buffer.text(), "a b c d\ne f");
    }
}
