//! Line ending detection.
//!
//! Wrapping works on `\n`. Text is normalized on the way in and converted back
//! to the ending it arrived with on the way out.

use std::borrow::Cow;

/// Line ending style of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

impl LineEnding {
    /// Style of the first line break in `text`. Text without breaks is `Lf`.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(i) if text[..i].ends_with('\r') => Self::Crlf,
            _ => Self::Lf,
        }
    }

    /// `text` with every `\r\n` turned into `\n`.
    pub fn normalize(text: &str) -> Cow<'_, str> {
        if text.contains("\r\n") {
            Cow::Owned(text.replace("\r\n", "\n"))
        } else {
            Cow::Borrowed(text)
        }
    }

    /// Convert `\n`-separated `text` to this ending.
    pub fn apply(self, text: &str) -> Cow<'_, str> {
        match self {
            Self::Lf => Cow::Borrowed(text),
            Self::Crlf => Cow::Owned(text.replace('\n', "\r\n")),
        }
    }
}
