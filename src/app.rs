//! Interactive editor state.
//!
//! `App` owns the buffer being edited and applies [`EditorCommand`]s to it.
//! Drawing lives in [`crate::ui`]; key mapping lives in [`crate::input`].

use std::path::PathBuf;

use crossterm::event::KeyEvent;

use crate::config::Settings;
use crate::constants::{editor as editor_consts, wrap as wrap_consts};
use crate::error::{Error, Result};
use crate::input::{
    AppMode, CommandLineHandler, EditorCommand, EditorHandler, GlobalHandler, InputContext,
    InputHandler, InputResult, Motion,
};
use crate::services::clipboard::{ClipboardSink, SystemClipboard};
use crate::services::editor::{
    wrap_paragraph_at_cursor, wrap_selection, Editor, Selection, TextBuffer, WrapOutcome,
};
use crate::wrap::{CodeWrapper, LineEnding};

/// Editor application state.
pub struct App {
    /// Text being edited.
    pub buffer: TextBuffer,
    /// File the buffer was loaded from and saves to.
    pub path: Option<PathBuf>,
    /// Loaded settings; file-type detection comes from here.
    pub settings: Settings,
    /// Current wrap column.
    pub wrap_column: usize,
    /// Columns per tab.
    pub tab_width: usize,
    /// Use minimum raggedness instead of greedy filling.
    pub minimum_raggedness: bool,
    /// Current input mode.
    pub mode: AppMode,
    /// Text typed after `:`.
    pub command_buffer: String,
    /// One-line message for the status bar.
    pub status_message: Option<String>,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    /// Unsaved changes exist.
    pub dirty: bool,
    /// First visible line.
    pub scroll_offset: usize,
    /// Number of visible lines, updated by the UI each frame.
    pub viewport_height: usize,
    /// Line ending the file is saved with. The buffer itself always uses `\n`.
    pub line_ending: LineEnding,
    selection_anchor: Option<(usize, usize)>,
    should_quit: bool,
    clipboard: Box<dyn ClipboardSink>,
}

impl App {
    /// Create an editor for `text`, remembering `path` for saving and file-type detection.
    pub fn new(text: &str, path: Option<PathBuf>, settings: Settings) -> Self {
        let wrap_column = settings.column_width_override.unwrap_or(wrap_consts::DEFAULT_WIDTH);
        Self {
            buffer: TextBuffer::from_text(&LineEnding::normalize(text)),
            path,
            tab_width: settings.tab_width,
            minimum_raggedness: settings.use_minimum_raggedness,
            settings,
            wrap_column,
            mode: AppMode::Editor,
            command_buffer: String::new(),
            status_message: None,
            show_help: false,
            dirty: false,
            scroll_offset: 0,
            viewport_height: editor_consts::DEFAULT_VIEWPORT_HEIGHT,
            line_ending: LineEnding::detect(text),
            selection_anchor: None,
            should_quit: false,
            clipboard: Box::<SystemClipboard>::default(),
        }
    }

    /// Load `path` into a new editor. A missing file starts an empty buffer.
    pub fn open(path: PathBuf, settings: Settings) -> Result<Self> {
        let text = if path.exists() {
            fs_err::read_to_string(&path).map_err(|e| Error::io(e, path.clone()))?
        } else {
            String::new()
        };
        tracing::info!("Opened {}", path.display());
        Ok(Self::new(&text, Some(path), settings))
    }

    /// Replace the clipboard backend.
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Whether the main loop should stop.
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Current selection, if the anchor differs from the caret.
    pub fn selection(&self) -> Option<Selection> {
        let (line, col) = self.buffer.cursor_position();
        self.selection_anchor
            .map(|(anchor_line, anchor_col)| Selection::new(anchor_line, anchor_col, line, col))
            .filter(|s| !s.is_empty())
            .map(|s| s.normalized())
    }

    /// Line range of the paragraph under the caret, for highlighting.
    pub fn current_paragraph_bounds(&self) -> Option<(usize, usize)> {
        let wrapper = self.wrapper().ok()?;
        let (line, _) = self.buffer.cursor_position();
        crate::services::editor::paragraph_bounds(self.buffer.content(), line, &wrapper)
    }

    /// Wrapper for the current file and editor settings.
    pub fn wrapper(&self) -> Result<CodeWrapper> {
        let mut options = self.settings.options_for(self.path.as_deref(), self.wrap_column);
        options.width = self.wrap_column;
        options.tab_width = self.tab_width;
        options.use_minimum_raggedness = self.minimum_raggedness;
        CodeWrapper::new(options)
    }

    /// Route a key through the handlers and apply the result.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.mode == AppMode::Editor {
            self.status_message = None;
        }

        let ctx = InputContext {
            mode: self.mode,
            show_help: self.show_help,
            command_buffer: &self.command_buffer,
        };

        let mut handlers: [Box<dyn InputHandler>; 3] = [
            Box::new(GlobalHandler),
            Box::new(EditorHandler),
            Box::new(CommandLineHandler),
        ];
        let result = handlers
            .iter_mut()
            .map(|h| (h.name(), h.handle(key, &ctx)))
            .find(|(_, r)| *r != InputResult::Ignored);

        let Some((name, result)) = result else {
            return;
        };
        tracing::trace!("{name} handled {key:?}");

        match result {
            InputResult::Command(cmd) => self.execute(cmd),
            InputResult::ModeChange(mode) => {
                self.mode = mode;
                self.command_buffer.clear();
            }
            InputResult::Status(_) => self.show_help = true,
            InputResult::Ignored => {}
        }
    }

    /// Apply a single command.
    pub fn execute(&mut self, cmd: EditorCommand) {
        match cmd {
            EditorCommand::Move { motion, extend } => self.move_cursor(motion, extend),
            EditorCommand::Insert(c) => self.edit(|b| b.insert_char(c)),
            EditorCommand::Newline => self.edit(|b| b.insert_char('\n')),
            // With a selection, deleting removes just the selection.
            EditorCommand::Backspace | EditorCommand::Delete if self.selection().is_some() => self.edit(|_| {}),
            EditorCommand::Backspace => self.edit(TextBuffer::delete_backward),
            EditorCommand::Delete => self.edit(TextBuffer::delete_forward),
            EditorCommand::WrapParagraph => self.wrap(true),
            EditorCommand::WrapSelection => self.wrap(false),
            EditorCommand::Copy => self.copy(),
            EditorCommand::Save => self.report(Self::save),
            EditorCommand::AdjustColumn(delta) => {
                self.set_wrap_column(self.wrap_column.saturating_add_signed(delta));
            }
            EditorCommand::CommandChar(c) => self.command_buffer.push(c),
            EditorCommand::CommandBackspace => {
                self.command_buffer.pop();
            }
            EditorCommand::CommandSubmit => {
                let command = std::mem::take(&mut self.command_buffer);
                self.mode = AppMode::Editor;
                self.run_command(&command);
            }
            EditorCommand::Quit => self.quit(false),
        }
        self.ensure_cursor_visible();
    }

    /// Insert pasted text at the caret, replacing any selection.
    pub fn paste(&mut self, text: &str) {
        match self.mode {
            AppMode::Editor => {
                let text = text.replace("\r\n", "\n");
                self.edit(|b| b.insert_str(&text));
                self.ensure_cursor_visible();
            }
            AppMode::Command => self.command_buffer.push_str(text.lines().next().unwrap_or_default()),
        }
    }

    /// Run a `:` command such as `w`, `wq`, `wrap 72` or `ragged on`.
    pub fn run_command(&mut self, command: &str) {
        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match (name, arg) {
            ("w", None) => self.report(Self::save),
            ("q", None) => self.quit(false),
            ("q!", None) => self.quit(true),
            ("wq" | "x", None) => match self.save() {
                Ok(_) => self.quit(false),
                Err(e) => self.status(e.to_string()),
            },
            ("wrap", None) => self.wrap(true),
            ("wrap", Some(col)) => match col.parse::<usize>() {
                Ok(col) => self.set_wrap_column(col),
                Err(_) => self.status(format!("Not a column: {col}")),
            },
            ("ragged", Some(flag @ ("on" | "off"))) => {
                self.minimum_raggedness = flag == "on";
                self.status(format!("Minimum raggedness {flag}"));
            }
            ("tab", Some(width)) => match width.parse::<usize>() {
                Ok(width) if width > 0 => {
                    self.tab_width = width;
                    self.status(format!("Tab width {width}"));
                }
                _ => self.status(format!("Not a tab width: {width}")),
            },
            ("settings", Some("save")) => {
                self.settings.column_width_override = Some(self.wrap_column);
                self.settings.use_minimum_raggedness = self.minimum_raggedness;
                self.settings.tab_width = self.tab_width;
                match self.settings.save() {
                    Ok(path) => self.status(format!("Settings saved to {}", path.display())),
                    Err(e) => self.status(e.to_string()),
                }
            }
            ("", None) => {}
            _ => self.status(format!("Unknown command: {command}")),
        }
    }

    /// Write the buffer to its file.
    pub fn save(&mut self) -> Result<String> {
        let path = self.path.clone().ok_or_else(|| {
            Error::config("No file name", "Start the editor with a file path to save")
        })?;
        let text = self.buffer.text();
        fs_err::write(&path, self.line_ending.apply(&text).as_bytes())
            .map_err(|e| Error::io(e, path.clone()))?;
        self.dirty = false;
        tracing::info!("Saved {}", path.display());
        Ok(format!("Wrote {}", path.display()))
    }

    fn report(&mut self, action: fn(&mut Self) -> Result<String>) {
        let message = action(self).unwrap_or_else(|e| e.to_string());
        self.status(message);
    }

    fn status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    fn quit(&mut self, force: bool) {
        if self.dirty && !force {
            self.status("Unsaved changes: :w to save, :q! to discard");
        } else {
            self.should_quit = true;
        }
    }

    fn set_wrap_column(&mut self, column: usize) {
        self.wrap_column = column.clamp(editor_consts::MIN_WRAP_COLUMN, editor_consts::MAX_WRAP_COLUMN);
        self.status(format!("Wrap column {}", self.wrap_column));
    }

    fn edit(&mut self, f: impl FnOnce(&mut TextBuffer)) {
        if let Some(selection) = self.selection() {
            self.buffer.replace(selection, "");
        }
        self.selection_anchor = None;
        f(&mut self.buffer);
        self.dirty = true;
    }

    fn wrap(&mut self, paragraph: bool) {
        let wrapper = match self.wrapper() {
            Ok(wrapper) => wrapper,
            Err(e) => {
                self.status(e.to_string());
                return;
            }
        };

        let selection = self.selection();
        let outcome = if paragraph {
            wrap_paragraph_at_cursor(&mut self.buffer, selection, &wrapper)
        } else {
            wrap_selection(&mut self.buffer, selection, &wrapper)
        };
        self.selection_anchor = None;

        match outcome {
            WrapOutcome::Wrapped { first, last } => {
                self.dirty = true;
                self.status(format!("Wrapped lines {}-{} at column {}", first + 1, last + 1, self.wrap_column));
            }
            WrapOutcome::Unchanged => self.status("Nothing to wrap"),
        }
    }

    fn copy(&mut self) {
        let selection = self.selection().unwrap_or_else(|| {
            let (line, _) = self.buffer.cursor_position();
            Selection::lines(self.buffer.content(), line, line)
        });
        let text = self.buffer.text_in(selection);
        match self.clipboard.set_text(&text) {
            Ok(()) => self.status(format!("Copied {} characters", text.chars().count())),
            Err(e) => self.status(e.to_string()),
        }
    }

    fn move_cursor(&mut self, motion: Motion, extend: bool) {
        let (line, col) = self.buffer.cursor_position();
        if extend {
            self.selection_anchor.get_or_insert((line, col));
        } else {
            self.selection_anchor = None;
        }

        let last_line = self.buffer.line_count().saturating_sub(1);
        let page = self.viewport_height.max(1);
        let (line, col) = match motion {
            Motion::Left if col > 0 => (line, col - 1),
            Motion::Left if line > 0 => (line - 1, self.buffer.line_len(line - 1)),
            Motion::Right if col < self.buffer.line_len(line) => (line, col + 1),
            Motion::Right if line < last_line => (line + 1, 0),
            Motion::Up => (line.saturating_sub(1), col),
            Motion::Down => ((line + 1).min(last_line), col),
            Motion::LineStart => (line, 0),
            Motion::LineEnd => (line, self.buffer.line_len(line)),
            Motion::PageUp => (line.saturating_sub(page), col),
            Motion::PageDown => ((line + page).min(last_line), col),
            Motion::Left | Motion::Right => (line, col),
        };
        self.buffer.set_cursor(line, col);
    }

    fn ensure_cursor_visible(&mut self) {
        let (line, _) = self.buffer.cursor_position();
        let height = self.viewport_height.max(1);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + height {
            self.scroll_offset = line + 1 - height;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::services::clipboard::MemoryClipboard;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app(text: &str) -> App {
        App::new(text, None, Settings::default()).with_clipboard(Box::<MemoryClipboard>::default())
    }

    #[test]
    fn wrap_paragraph_command_reflows_at_column() {
        let mut app = app("// one two three four five six");
        app.run_command("wrap 20");
        app.execute(EditorCommand::WrapParagraph);
        assert_eq!(app.buffer.text(), "// one two three\n// four five six");
        assert!(app.dirty);
    }

    #[test]
    fn wrap_column_is_clamped() {
        let mut app = app("");
        app.run_command("wrap 2");
        assert_eq!(app.wrap_column, editor_consts::MIN_WRAP_COLUMN);
    }

    #[test]
    fn shift_motion_builds_selection() {
        let mut app = app("alpha\nbeta");
        app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT));
        app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT));
        assert_eq!(app.selection(), Some(Selection::new(0, 0, 0, 2)));

        app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::empty()));
        assert_eq!(app.selection(), None);
    }

    #[test]
    fn typing_replaces_selection() {
        let mut app = app("alpha");
        app.execute(EditorCommand::Move { motion: Motion::LineEnd, extend: true });
        app.execute(EditorCommand::Insert('x'));
        assert_eq!(app.buffer.text(), "x");
    }

    #[test]
    fn backspace_removes_only_the_selection() {
        let mut app = app("alpha");
        app.execute(EditorCommand::Move { motion: Motion::Right, extend: true });
        app.execute(EditorCommand::Move { motion: Motion::Right, extend: true });
        app.execute(EditorCommand::Backspace);
        assert_eq!(app.buffer.text(), "pha");
    }

    #[test]
    fn quit_refuses_with_unsaved_changes() {
        let mut app = app("a");
        app.execute(EditorCommand::Insert('b'));
        app.run_command("q");
        assert!(!app.should_quit());
        app.run_command("q!");
        assert!(app.should_quit());
    }

    #[test]
    fn command_mode_round_trip() {
        let mut app = app("text");
        app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::empty()));
        assert_eq!(app.mode, AppMode::Command);
        for c in "ragged on".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty()));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));
        assert_eq!(app.mode, AppMode::Editor);
        assert!(app.minimum_raggedness);
    }

    #[test]
    fn save_writes_buffer_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut app = App::new("hello", Some(path.clone()), Settings::default());
        app.execute(EditorCommand::Insert('!'));
        app.execute(EditorCommand::Save);
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "!hello");
        assert!(!app.dirty);
    }

    #[test]
    fn save_keeps_crlf_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs_err::write(&path, "one\r\ntwo\r\n").unwrap();

        let mut app = App::open(path.clone(), Settings::default()).unwrap();
        assert_eq!(app.line_ending, LineEnding::Crlf);
        assert_eq!(app.buffer.content(), ["one", "two", ""]);

        app.execute(EditorCommand::Insert('!'));
        app.execute(EditorCommand::Save);
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "!one\r\ntwo\r\n");
    }

    #[test]
    fn save_without_path_reports_error() {
        let mut app = app("text");
        app.run_command("w");
        assert!(app.status_message.unwrap().contains("No file name"));
    }

    #[test]
    fn copy_without_selection_takes_caret_line() {
        let mut app = app("first\nsecond");
        app.execute(EditorCommand::Move { motion: Motion::Down, extend: false });
        app.execute(EditorCommand::Copy);
        assert_eq!(app.status_message.as_deref(), Some("Copied 6 characters"));
    }

    #[test]
    fn paste_normalizes_line_endings() {
        let mut app = app("");
        app.paste("a\r\nb");
        assert_eq!(app.buffer.text(), "a\nb");
        assert_eq!(app.buffer.cursor_position(), (1, 1));
    }

    #[test]
    fn unknown_command_is_reported() {
        let mut app = app("text");
        app.run_command("frobnicate");
        assert_eq!(app.status_message.as_deref(), Some("Unknown command: frobnicate"));
    }
}
