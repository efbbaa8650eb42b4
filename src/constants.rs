//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Wrapping engine constants.
pub mod wrap {
    /// Default column width to wrap text to.
    pub const DEFAULT_WIDTH: usize = 80;

    /// Default number of columns a tab character represents.
    pub const DEFAULT_TAB_WIDTH: usize = 4;

    /// Stand-in for tab characters while wrapping. Never expected in real input.
    pub const TAB_PLACEHOLDER: char = '☃';

    /// Comment leaders recognised in source files.
    pub const CODE_COMMENT_PATTERN: &str = r"(/\*+|\*/|\*|\.|#+|//+|;+|--)?";

    /// Comment leaders recognised in plain-text files (Markdown, `AsciiDoc`).
    pub const PLAINTEXT_COMMENT_PATTERN: &str = r"(//)?";

    /// Javadoc-style HTML tags that act as paragraph breaks.
    pub const HTML_SEPARATOR_PATTERN: &str = r"<[pP]>|<[bB][rR] ?/?>";

    /// Line separator used for every line the wrapper emits.
    pub const LINE_SEPARATOR: &str = "\n";

    /// File extensions treated as plain text by default.
    pub const DEFAULT_PLAINTEXT_FILE_TYPES: &str = ".md,.markdown,.adoc,.asciidoc,.txt";
}

/// Editor configuration constants.
pub mod editor {
    /// Minimum wrap column width allowed.
    pub const MIN_WRAP_COLUMN: usize = 10;

    /// Maximum wrap column width allowed.
    pub const MAX_WRAP_COLUMN: usize = 400;

    /// Default viewport height in lines.
    pub const DEFAULT_VIEWPORT_HEIGHT: usize = 20;
}

/// Settings persistence constants.
pub mod settings {
    /// Directory name under the platform config directory.
    pub const APP_DIR: &str = "colwrap";

    /// Settings file name.
    pub const FILE_NAME: &str = "settings.json";
}

/// UI layout constants.
pub mod ui {
    /// Height of the status bar at the bottom of the screen.
    pub const STATUS_BAR_HEIGHT: u16 = 3;

    /// Event poll interval in milliseconds.
    pub const POLL_INTERVAL_MS: u64 = 50;
}
