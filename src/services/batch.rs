//! Batch wrapping of files and directory trees.
//!
//! Directories are walked with `walkdir`, files are wrapped in parallel with
//! `rayon`. Each file gets the wrapper its extension calls for.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::Settings;
use crate::constants::wrap;
use crate::error::{Error, Result};
use crate::services::editor::{wrap_paragraph_at_cursor, wrap_selection, Editor, Selection, TextBuffer};
use crate::wrap::{CodeWrapper, LineEnding, WrapOptions};

/// What to do with the wrapped result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// Rewrite files whose content changed.
    Write,
    /// Only report files that would change.
    Check,
    /// Return the wrapped text without touching the files.
    Stdout,
}

/// Which part of each file to wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The whole file.
    All,
    /// Lines `start..=end`, 0-indexed.
    Lines {
        /// First line.
        start: usize,
        /// Last line.
        end: usize,
    },
    /// The paragraph around a 0-indexed line.
    ParagraphAt(usize),
}

/// Batch job options.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Output mode.
    pub mode: BatchMode,
    /// Part of each file to wrap.
    pub scope: Scope,
    /// Extensions (without dots) to pick up when walking directories.
    /// Empty means every file.
    pub extensions: Vec<String>,
    /// Width used when the settings carry no override.
    pub fallback_width: usize,
    /// Treat every input as prose, whatever its extension.
    pub plaintext: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            mode: BatchMode::Stdout,
            scope: Scope::All,
            extensions: Vec::new(),
            fallback_width: wrap::DEFAULT_WIDTH,
            plaintext: false,
        }
    }
}

/// Result for a single file.
#[derive(Debug)]
pub struct FileReport {
    /// File that was processed.
    pub path: PathBuf,
    /// Whether wrapping changed the content.
    pub changed: bool,
    /// Wrapped content.
    pub output: String,
}

/// Results for a whole batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files processed successfully, in input order.
    pub files: Vec<FileReport>,
    /// Files that failed, with their errors.
    pub failures: Vec<Error>,
}

impl BatchReport {
    /// Files whose content changed (or would change in check mode).
    pub fn changed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.changed)
    }
}

/// Expand paths into files: directories are walked, files are kept as given.
///
/// Files named explicitly are always included. Files found by walking must
/// match one of `extensions` unless the list is empty.
pub fn collect_files(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .follow_links(true)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                    .filter(|e| e.file_type().is_file())
                    .filter(|e| matches_extension(e.path(), extensions))
                    .map(walkdir::DirEntry::into_path),
            );
        } else {
            return Err(Error::io(
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
                path.clone(),
            ));
        }
    }

    Ok(files)
}

/// Wrap every file according to `options`.
pub fn run(files: &[PathBuf], settings: &Settings, options: &BatchOptions) -> BatchReport {
    let start = Instant::now();
    let results: Vec<Result<FileReport>> = files
        .par_iter()
        .map(|path| process_file(path, settings, options))
        .collect();

    let mut report = BatchReport::default();
    for result in results {
        match result {
            Ok(file) => report.files.push(file),
            Err(e) => {
                tracing::warn!("{e}");
                report.failures.push(e);
            }
        }
    }

    let changed = report.changed().count();
    let elapsed = start.elapsed();
    tracing::info!("Wrapped {} files ({changed} changed) in {elapsed:?}", report.files.len());
    report
}

/// Wrap `text` as if it were the content of `path`.
///
/// The result keeps the line ending of `text`.
pub fn wrap_text(text: &str, path: Option<&Path>, settings: &Settings, options: &BatchOptions) -> Result<String> {
    let ending = LineEnding::detect(text);
    let wrapped = wrap_normalized(&LineEnding::normalize(text), path, settings, options)?;
    Ok(ending.apply(&wrapped).into_owned())
}

fn wrap_normalized(text: &str, path: Option<&Path>, settings: &Settings, options: &BatchOptions) -> Result<String> {
    let mut wrap_options = settings.options_for(path, options.fallback_width);
    if options.plaintext {
        let prose = WrapOptions::plaintext();
        wrap_options.comment_pattern = prose.comment_pattern;
        wrap_options.preserve_leading_symbol_spacing = prose.preserve_leading_symbol_spacing;
    }
    let wrapper = CodeWrapper::new(wrap_options)?;

    match options.scope {
        Scope::All => Ok(wrapper.wrap(text)),
        Scope::Lines { start, end } => {
            let mut buffer = TextBuffer::from_text(text);
            check_line(&buffer, end, path)?;
            let selection = Selection::lines(buffer.content(), start, end);
            wrap_selection(&mut buffer, Some(selection), &wrapper);
            Ok(buffer.text())
        }
        Scope::ParagraphAt(line) => {
            let mut buffer = TextBuffer::from_text(text);
            check_line(&buffer, line, path)?;
            buffer.set_cursor(line, 0);
            wrap_paragraph_at_cursor(&mut buffer, None, &wrapper);
            Ok(buffer.text())
        }
    }
}

fn process_file(path: &Path, settings: &Settings, options: &BatchOptions) -> Result<FileReport> {
    let original = fs_err::read_to_string(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
    let output = wrap_text(&original, Some(path), settings, options)?;
    let changed = output != original;

    if changed && options.mode == BatchMode::Write {
        fs_err::write(path, &output).map_err(|e| Error::io(e, path.to_path_buf()))?;
        tracing::debug!("Rewrote {}", path.display());
    }

    Ok(FileReport { path: path.to_path_buf(), changed, output })
}

fn check_line(buffer: &TextBuffer, line: usize, path: Option<&Path>) -> Result<()> {
    if line < buffer.line_count() {
        Ok(())
    } else {
        Err(Error::parse(
            format!("line {} is past the end ({} lines)", line + 1, buffer.line_count()),
            path.map(Path::to_path_buf),
        ))
    }
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn plaintext_flag_keeps_bullet_spacing() {
        let options = BatchOptions { fallback_width: 20, plaintext: true, ..BatchOptions::default() };
        let wrapped = wrap_text("- alpha beta gamma delta epsilon", None, &Settings::default(), &options).unwrap();
        assert_eq!(wrapped, "- alpha beta gamma\n  delta epsilon");
    }

    #[test]
    fn scoped_wrap_keeps_crlf() {
        let options = BatchOptions {
            fallback_width: 18,
            scope: Scope::ParagraphAt(0),
            ..BatchOptions::default()
        };
        let text = "// one two three four five\r\n\r\nfn main() {}\r\n";
        let wrapped = wrap_text(text, None, &Settings::default(), &options).unwrap();
        assert_eq!(wrapped, "// one two three\r\n// four five\r\n\r\nfn main() {}\r\n");
    }

    #[test]
    fn line_scope_past_end_is_an_error() {
        let options = BatchOptions { scope: Scope::Lines { start: 0, end: 5 }, ..BatchOptions::default() };
        assert!(wrap_text("one line", None, &Settings::default(), &options).is_err());
    }

    #[test]
    fn empty_extension_list_matches_everything() {
        assert!(matches_extension(Path::new("a.rs"), &[]));
        assert!(matches_extension(Path::new("Makefile"), &[]));
    }

    #[test]
    fn extensions_match_with_or_without_dot() {
        let exts = vec!["rs".to_string(), ".MD".to_string()];
        assert!(matches_extension(Path::new("lib.rs"), &exts));
        assert!(matches_extension(Path::new("README.md"), &exts));
        assert!(!matches_extension(Path::new("main.py"), &exts));
    }
}
