//! Input handling abstractions.
//!
//! This module provides traits and types for handling keyboard input
//! in a modular way, allowing mode-specific handlers to be tested independently.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of processing an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// The input maps to an editor command.
    Command(EditorCommand),
    /// The input was ignored (not applicable to this handler).
    Ignored,
    /// The mode should change.
    ModeChange(AppMode),
    /// A status message should be shown.
    Status(String),
}

/// Application modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Editing text.
    Editor,
    /// Typing a `:` command.
    Command,
}

/// Caret movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// One character left.
    Left,
    /// One character right.
    Right,
    /// One line up.
    Up,
    /// One line down.
    Down,
    /// Start of the line.
    LineStart,
    /// End of the line.
    LineEnd,
    /// One screen up.
    PageUp,
    /// One screen down.
    PageDown,
}

/// Everything the editor can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    /// Move the caret, extending the selection when `extend` is set.
    Move {
        /// Direction of movement.
        motion: Motion,
        /// Keep the selection anchor and grow the selection.
        extend: bool,
    },
    /// Insert a character at the caret.
    Insert(char),
    /// Split the line at the caret.
    Newline,
    /// Delete before the caret.
    Backspace,
    /// Delete at the caret.
    Delete,
    /// Wrap the paragraph around the caret.
    WrapParagraph,
    /// Wrap the selection or the caret line.
    WrapSelection,
    /// Copy the selection or caret line to the clipboard.
    Copy,
    /// Write the buffer to disk.
    Save,
    /// Move the wrap column by the given number of columns.
    AdjustColumn(isize),
    /// Append a character to the command line.
    CommandChar(char),
    /// Delete the last command line character.
    CommandBackspace,
    /// Run the command line.
    CommandSubmit,
    /// Quit, refusing if there are unsaved changes.
    Quit,
}

/// Context passed to input handlers.
///
/// This provides handlers with the information they need to process
/// input without directly accessing the full App state.
pub struct InputContext<'a> {
    /// Current application mode.
    pub mode: AppMode,
    /// Whether help is currently shown.
    pub show_help: bool,
    /// Current command buffer contents.
    pub command_buffer: &'a str,
}

/// Trait for handling keyboard input.
///
/// Implementations of this trait handle input for specific modes
/// or input contexts.
pub trait InputHandler {
    /// Handle a key event.
    ///
    /// # Arguments
    /// * `key` - The key event to handle
    /// * `ctx` - Context about the current application state
    ///
    /// # Returns
    /// The result of handling the input.
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext<'_>) -> InputResult;

    /// Get the name of this handler (for debugging).
    fn name(&self) -> &'static str;
}

/// Handler for global shortcuts (help).
#[derive(Debug, Default)]
pub struct GlobalHandler;

impl InputHandler for GlobalHandler {
    fn handle(&mut self, key: KeyEvent, _ctx: &InputContext<'_>) -> InputResult {
        if key.code == KeyCode::F(1) {
            return InputResult::Status("Help".to_string());
        }

        InputResult::Ignored
    }

    fn name(&self) -> &'static str {
        "GlobalHandler"
    }
}

/// Handler for keys while editing text.
#[derive(Debug, Default)]
pub struct EditorHandler;

impl InputHandler for EditorHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext<'_>) -> InputResult {
        if ctx.mode != AppMode::Editor {
            return InputResult::Ignored;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        let motion = |motion| InputResult::Command(EditorCommand::Move { motion, extend });

        match key.code {
            KeyCode::Left => motion(Motion::Left),
            KeyCode::Right => motion(Motion::Right),
            KeyCode::Up => motion(Motion::Up),
            KeyCode::Down => motion(Motion::Down),
            KeyCode::Home => motion(Motion::LineStart),
            KeyCode::End => motion(Motion::LineEnd),
            KeyCode::PageUp => motion(Motion::PageUp),
            KeyCode::PageDown => motion(Motion::PageDown),
            KeyCode::Enter => InputResult::Command(EditorCommand::Newline),
            KeyCode::Backspace => InputResult::Command(EditorCommand::Backspace),
            KeyCode::Delete => InputResult::Command(EditorCommand::Delete),
            KeyCode::Tab => InputResult::Command(EditorCommand::Insert('\t')),
            KeyCode::Char('q') if alt => InputResult::Command(EditorCommand::WrapParagraph),
            KeyCode::Char('w') if ctrl => InputResult::Command(EditorCommand::WrapSelection),
            KeyCode::Char('y') if ctrl => InputResult::Command(EditorCommand::Copy),
            KeyCode::Char('s') if ctrl => InputResult::Command(EditorCommand::Save),
            KeyCode::Char('q') if ctrl => InputResult::Command(EditorCommand::Quit),
            KeyCode::Char('[') if alt => InputResult::Command(EditorCommand::AdjustColumn(-1)),
            KeyCode::Char(']') if alt => InputResult::Command(EditorCommand::AdjustColumn(1)),
            KeyCode::Esc => InputResult::ModeChange(AppMode::Command),
            KeyCode::Char(c) if !ctrl && !alt => InputResult::Command(EditorCommand::Insert(c)),
            _ => InputResult::Ignored,
        }
    }

    fn name(&self) -> &'static str {
        "EditorHandler"
    }
}

/// Handler for the `:` command line.
#[derive(Debug, Default)]
pub struct CommandLineHandler;

impl InputHandler for CommandLineHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext<'_>) -> InputResult {
        if ctx.mode != AppMode::Command {
            return InputResult::Ignored;
        }

        match key.code {
            KeyCode::Esc => InputResult::ModeChange(AppMode::Editor),
            KeyCode::Enter => InputResult::Command(EditorCommand::CommandSubmit),
            KeyCode::Backspace if ctx.command_buffer.is_empty() => InputResult::ModeChange(AppMode::Editor),
            KeyCode::Backspace => InputResult::Command(EditorCommand::CommandBackspace),
            // Leading ':' is implied; typing it is harmless.
            KeyCode::Char(':') if ctx.command_buffer.is_empty() => InputResult::Ignored,
            KeyCode::Char(c) => InputResult::Command(EditorCommand::CommandChar(c)),
            _ => InputResult::Ignored,
        }
    }

    fn name(&self) -> &'static str {
        "CommandLineHandler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn make_context(mode: AppMode) -> InputContext<'static> {
        InputContext {
            mode,
            show_help: false,
            command_buffer: "",
        }
    }

    #[test]
    fn test_global_handler_f1() {
        let mut handler = GlobalHandler;
        let ctx = make_context(AppMode::Editor);
        let result = handler.handle(make_key(KeyCode::F(1)), &ctx);

        assert!(matches!(result, InputResult::Status(_)));
    }

    #[test]
    fn test_alt_q_wraps_paragraph() {
        let mut handler = EditorHandler;
        let ctx = make_context(AppMode::Editor);
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::ALT);

        assert_eq!(handler.handle(key, &ctx), InputResult::Command(EditorCommand::WrapParagraph));
    }

    #[test]
    fn test_shift_arrow_extends_selection() {
        let mut handler = EditorHandler;
        let ctx = make_context(AppMode::Editor);
        let key = KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT);

        assert_eq!(
            handler.handle(key, &ctx),
            InputResult::Command(EditorCommand::Move { motion: Motion::Down, extend: true })
        );
    }

    #[test]
    fn test_plain_char_inserts() {
        let mut handler = EditorHandler;
        let ctx = make_context(AppMode::Editor);

        assert_eq!(
            handler.handle(make_key(KeyCode::Char('x')), &ctx),
            InputResult::Command(EditorCommand::Insert('x'))
        );
    }

    #[test]
    fn test_editor_handler_ignores_command_mode() {
        let mut handler = EditorHandler;
        let ctx = make_context(AppMode::Command);

        assert_eq!(handler.handle(make_key(KeyCode::Char('x')), &ctx), InputResult::Ignored);
    }

    #[test]
    fn test_command_line_escape_returns_to_editor() {
        let mut handler = CommandLineHandler;
        let ctx = make_context(AppMode::Command);

        assert_eq!(
            handler.handle(make_key(KeyCode::Esc), &ctx),
            InputResult::ModeChange(AppMode::Editor)
        );
    }

    #[test]
    fn test_command_line_collects_chars() {
        let mut handler = CommandLineHandler;
        let ctx = make_context(AppMode::Command);

        assert_eq!(
            handler.handle(make_key(KeyCode::Char('w')), &ctx),
            InputResult::Command(EditorCommand::CommandChar('w'))
        );
    }
}
