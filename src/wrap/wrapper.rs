//! Code-aware paragraph wrapper.
//!
//! Reflows comments like the emacs `fill-paragraph` command: comment leaders
//! and leading whitespace are kept as an indent, hard-wrapped lines are joined,
//! and the joined text is broken again to fit the column width.

// Allow expect for compile-time constant regex patterns in LazyLock statics
#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

use super::algorithms::{wrap_greedy, wrap_minimum_raggedness};
use super::line_ending::LineEnding;
use crate::constants::wrap::{
    CODE_COMMENT_PATTERN, DEFAULT_TAB_WIDTH, DEFAULT_WIDTH, HTML_SEPARATOR_PATTERN,
    LINE_SEPARATOR, PLAINTEXT_COMMENT_PATTERN, TAB_PLACEHOLDER,
};
use crate::error::Result;

/// Runs of line break characters.
static RE_LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\r\n]+").expect("valid regex: RE_LINE_BREAKS")
});

/// An indent that opens a block comment or docstring.
static RE_COMMENT_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(/\*+|"""|''')\s*$"#).expect("valid regex: RE_COMMENT_OPENER")
});

/// List markers in prose: `*`, `-` or `1.` followed by whitespace.
static RE_MEANINGFUL_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s+)?(\*|-|(\d+\.))(\s+)").expect("valid regex: RE_MEANINGFUL_SYMBOL")
});

/// Whitespace captured before a block comment opener.
static RE_LEADING_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*").expect("valid regex: RE_LEADING_WHITESPACE")
});

/// Compiled patterns for the default code comment leaders.
static DEFAULT_PATTERNS: LazyLock<Patterns> = LazyLock::new(|| {
    Patterns::compile(CODE_COMMENT_PATTERN).expect("valid regex: DEFAULT_PATTERNS")
});

/// Options controlling how a [`CodeWrapper`] reflows text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapOptions {
    /// Column width to wrap text to.
    pub width: usize,
    /// Number of columns a tab character represents.
    pub tab_width: usize,
    /// Balance line lengths instead of filling each line greedily.
    pub use_minimum_raggedness: bool,
    /// Align continuation lines under a leading list symbol (`*`, `-`, `1.`).
    ///
    /// Only useful for prose files without comments but with lots of symbols.
    pub preserve_leading_symbol_spacing: bool,
    /// Optional-group regex matching comment leaders.
    pub comment_pattern: String,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            tab_width: DEFAULT_TAB_WIDTH,
            use_minimum_raggedness: false,
            preserve_leading_symbol_spacing: false,
            comment_pattern: CODE_COMMENT_PATTERN.to_string(),
        }
    }
}

impl WrapOptions {
    /// Options for Markdown, `AsciiDoc` and other prose files.
    pub fn plaintext() -> Self {
        Self {
            preserve_leading_symbol_spacing: true,
            comment_pattern: PLAINTEXT_COMMENT_PATTERN.to_string(),
            ..Self::default()
        }
    }
}

/// A line split into its indent and the text after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineData {
    /// Leading whitespace and comment characters, without line breaks.
    pub indent: String,
    /// Leading list symbol with its surrounding whitespace, if any.
    pub meaningful_symbol: String,
    /// Trimmed text after the indent.
    pub rest: String,
}

#[derive(Debug, Clone)]
struct Patterns {
    paragraph_separator: Regex,
    indent: Regex,
    empty_comment_line: Regex,
}

impl Patterns {
    fn compile(comment: &str) -> Result<Self> {
        let indent = format!(r"^(\s|{TAB_PLACEHOLDER})*{comment}\s*({HTML_SEPARATOR_PATTERN})?");
        Ok(Self {
            paragraph_separator: Regex::new(&format!(
                r"(\r?\n)\s*{comment}\s*({HTML_SEPARATOR_PATTERN})?(\r?\n)"
            ))?,
            empty_comment_line: Regex::new(&format!("(?mR){indent}$"))?,
            indent: Regex::new(&indent)?,
        })
    }
}

/// Code-aware text wrapper.
///
/// A paragraph is text separated by empty lines. A line counts as empty if it
/// holds only comment characters and at most one `<p>` or `<br>` tag, which is
/// common in Javadoc.
#[derive(Debug, Clone)]
pub struct CodeWrapper {
    options: WrapOptions,
    patterns: Patterns,
    tab_expansion: String,
}

impl Default for CodeWrapper {
    fn default() -> Self {
        let options = WrapOptions::default();
        let tab_expansion = TAB_PLACEHOLDER.to_string().repeat(options.tab_width);
        Self { options, patterns: DEFAULT_PATTERNS.clone(), tab_expansion }
    }
}

impl CodeWrapper {
    /// Create a wrapper from options, compiling its comment patterns.
    pub fn new(mut options: WrapOptions) -> Result<Self> {
        options.width = options.width.max(1);
        options.tab_width = options.tab_width.max(1);
        let patterns = if options.comment_pattern == CODE_COMMENT_PATTERN {
            DEFAULT_PATTERNS.clone()
        } else {
            Patterns::compile(&options.comment_pattern)?
        };
        let tab_expansion = TAB_PLACEHOLDER.to_string().repeat(options.tab_width);
        Ok(Self { options, patterns, tab_expansion })
    }

    /// Start building a wrapper from default options.
    pub fn builder() -> CodeWrapperBuilder {
        CodeWrapperBuilder::default()
    }

    /// The options this wrapper was built with.
    pub const fn options(&self) -> &WrapOptions {
        &self.options
    }

    /// Wrap `text`, which may hold several paragraphs, to the chosen width.
    ///
    /// Separators between paragraphs are kept verbatim, as is a trailing
    /// newline. Text that uses `\r\n` comes back with `\r\n` throughout.
    pub fn wrap(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let ending = LineEnding::detect(text);
        let text = LineEnding::normalize(text).replace('\t', &self.tab_expansion);
        let mut result = String::with_capacity(text.len() + 16);
        let mut location = 0;

        for separator in self.patterns.paragraph_separator.find_iter(&text) {
            result.push_str(&self.wrap_paragraph(&text[location..separator.start()]));
            result.push_str(separator.as_str());
            location = separator.end();
        }

        if location < text.len() {
            result.push_str(&self.wrap_paragraph(&text[location..]));
        }

        if text.ends_with(LINE_SEPARATOR) && !result.ends_with(LINE_SEPARATOR) {
            result.push_str(LINE_SEPARATOR);
        }

        let result = result.replace(&self.tab_expansion, "\t");
        ending.apply(&result).into_owned()
    }

    /// Split `text` on its indent, including comment characters.
    ///
    /// Only the first indent-like sequence counts, so comments embedded in
    /// comments stay in the text. For example `  // Comment` splits into
    /// `"  // "` and `"Comment"`.
    pub fn split_on_indent(&self, text: &str) -> LineData {
        let mut data = LineData { rest: text.to_string(), ..LineData::default() };

        if let Some(indent) = self.patterns.indent.find(text) {
            // "/*\n" can match, so drop the line break.
            data.indent = RE_LINE_BREAKS.replace_all(indent.as_str(), "").into_owned();
            data.rest = trim_control(&text[indent.end()..]).to_string();
        }

        if let Some(symbol) = RE_MEANINGFUL_SYMBOL.find(text) {
            data.meaningful_symbol = symbol.as_str().to_string();
        }

        data
    }

    /// Wrap one paragraph, keeping comment-only lines inside it in place.
    fn wrap_paragraph(&self, paragraph: &str) -> String {
        let mut out = String::with_capacity(paragraph.len() + 16);
        let mut location = 0;

        for empty_line in self.patterns.empty_comment_line.find_iter(paragraph) {
            let marker = empty_line.as_str();
            // A bare newline needs no preserving.
            if marker.is_empty() {
                continue;
            }

            let lines = self.break_to_lines(&paragraph[location..empty_line.start()]);

            if paragraph.starts_with(marker) {
                out.push_str(marker);
                out.push_str(LINE_SEPARATOR);
            }
            push_lines(&mut out, &lines);
            if paragraph.ends_with(marker) {
                out.push_str(marker);
            }

            location = empty_line.end();
        }

        if location < paragraph.len() {
            push_lines(&mut out, &self.break_to_lines(&paragraph[location..]));
        }

        // The caller appends separators after the last line.
        if out.ends_with(LINE_SEPARATOR) {
            out.truncate(out.len() - LINE_SEPARATOR.len());
        }

        out
    }

    /// Reflow a single paragraph into lines of the chosen width.
    ///
    /// Block comment openers are longer than their continuation prefix
    /// (`/** ` against ` * `), so the first line may stick out by a column or
    /// two.
    fn break_to_lines(&self, text: &str) -> Vec<String> {
        let first_line_indent = self.split_on_indent(text).indent;
        let is_comment_opener = RE_COMMENT_OPENER.is_match(&first_line_indent);
        let mut unwrapped = self.unwrap(text);
        let mut leading_symbol = String::new();

        let width = if self.options.preserve_leading_symbol_spacing {
            if let Some(symbol) = RE_MEANINGFUL_SYMBOL.find(text) {
                leading_symbol = symbol.as_str().to_string();
                unwrapped = strip_leading_symbol(&unwrapped, &leading_symbol).to_string();
            }
            self.options.width.saturating_sub(char_len(&leading_symbol))
        } else {
            self.options.width.saturating_sub(char_len(&first_line_indent))
        };

        let lines = if self.options.use_minimum_raggedness {
            wrap_minimum_raggedness(&unwrapped, width)
        } else {
            wrap_greedy(&unwrapped, width)
        };

        let continuation_indent = if is_comment_opener {
            let whitespace = RE_LEADING_WHITESPACE
                .find(&first_line_indent)
                .map_or("", |m| m.as_str());
            format!("{whitespace} * ")
        } else if leading_symbol.is_empty() {
            first_line_indent.clone()
        } else {
            " ".repeat(char_len(&leading_symbol))
        };
        let first_indent = if leading_symbol.is_empty() { first_line_indent } else { leading_symbol };

        lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let indent = if i == 0 { &first_indent } else { &continuation_indent };
                format!("{indent}{line}")
            })
            .collect()
    }

    /// Join a hard-wrapped paragraph into one line without indents.
    fn unwrap(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut lines: Vec<&str> = RE_LINE_BREAKS.split(text).collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        let count = lines.len();
        let mut result = String::with_capacity(text.len());
        let mut after_break = false;

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                after_break = true;
                continue;
            }

            let rest = self.split_on_indent(line).rest;
            // Only join with a space between two lines that held words.
            if !(after_break || count == 1 || i == 0) {
                result.push(' ');
            }
            result.push_str(&rest);
            after_break = false;
        }

        result
    }
}

/// Builder for [`CodeWrapper`].
#[derive(Debug, Clone, Default)]
pub struct CodeWrapperBuilder {
    options: WrapOptions,
}

impl CodeWrapperBuilder {
    /// Set the column width.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.options.width = width;
        self
    }

    /// Set how many columns a tab represents.
    #[must_use]
    pub fn tab_width(mut self, tab_width: usize) -> Self {
        self.options.tab_width = tab_width;
        self
    }

    /// Use the minimum raggedness algorithm instead of greedy filling.
    #[must_use]
    pub fn minimum_raggedness(mut self, enabled: bool) -> Self {
        self.options.use_minimum_raggedness = enabled;
        self
    }

    /// Align continuation lines under leading list symbols.
    #[must_use]
    pub fn preserve_leading_symbol_spacing(mut self, enabled: bool) -> Self {
        self.options.preserve_leading_symbol_spacing = enabled;
        self
    }

    /// Replace the comment leader pattern. It must be an optional group.
    #[must_use]
    pub fn comment_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.options.comment_pattern = pattern.into();
        self
    }

    /// Compile the wrapper.
    pub fn build(self) -> Result<CodeWrapper> {
        CodeWrapper::new(self.options)
    }
}

fn push_lines(out: &mut String, lines: &[String]) {
    for line in lines {
        out.push_str(line);
        out.push_str(LINE_SEPARATOR);
    }
}

/// Trim spaces and control characters from both ends.
fn trim_control(text: &str) -> &str {
    text.trim_matches(|c: char| c <= ' ')
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Remove the list symbol from the start of unwrapped text.
///
/// The symbol match may include leading whitespace that the indent already
/// consumed, so only its visible part is stripped.
fn strip_leading_symbol<'a>(unwrapped: &'a str, symbol: &str) -> &'a str {
    unwrapped.strip_prefix(symbol.trim()).map_or(unwrapped, str::trim_start)
}
