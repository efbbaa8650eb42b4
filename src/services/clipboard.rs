//! System clipboard access.

use crate::error::Result;

/// Destination for copied text.
///
/// The TUI copies through this trait so tests can capture text without a
/// display server.
pub trait ClipboardSink {
    /// Put `text` on the clipboard.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Clipboard backed by the operating system via `arboard`.
///
/// The handle is opened on first use, so a headless session only fails when
/// something is actually copied.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new()?);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard.set_text(text.to_string())?;
        }
        Ok(())
    }
}

/// In-memory clipboard for tests and headless sessions.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    /// Most recently copied text.
    pub contents: Option<String>,
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
