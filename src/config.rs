//! Application configuration.
//!
//! Settings are loaded from a JSON file in the platform config directory,
//! then overridden from environment variables and `.env` files.

use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{settings, wrap};
use crate::error::{Error, Result};
use crate::wrap::{CodeWrapper, WrapOptions};

/// Persistent wrap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Column width that wins over the caller's fallback width.
    pub column_width_override: Option<usize>,
    /// Balance line lengths instead of filling greedily.
    pub use_minimum_raggedness: bool,
    /// Comma-separated extensions (with dots) treated as prose.
    pub plaintext_file_types: String,
    /// Columns a tab character represents.
    pub tab_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            column_width_override: None,
            use_minimum_raggedness: false,
            plaintext_file_types: wrap::DEFAULT_PLAINTEXT_FILE_TYPES.to_string(),
            tab_width: wrap::DEFAULT_TAB_WIDTH,
        }
    }
}

impl Settings {
    /// Load settings from the settings file and environment
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let path = settings_path();
        let mut settings = match &path {
            Some(path) if path.is_file() => Self::load_from(path)?,
            _ => Self::default(),
        };

        settings.apply_env();
        Ok(settings)
    }

    /// Load settings from a specific JSON file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs_err::read_to_string(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
        let settings: Self = serde_json::from_str(&raw)?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Persist settings to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = settings_path().ok_or_else(|| {
            Error::config(
                "No config directory available",
                "Set COLWRAP_SETTINGS to a writable file path",
            )
        })?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Persist settings to a specific JSON file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent).map_err(|e| Error::io(e, parent.to_path_buf()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs_err::write(path, json).map_err(|e| Error::io(e, path.to_path_buf()))?;
        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Apply `COLWRAP_*` environment overrides. Unparseable values are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(width) = env::var("COLWRAP_WIDTH") {
            match width.trim().parse::<usize>() {
                Ok(width) if width > 0 => self.column_width_override = Some(width),
                _ => tracing::warn!("Ignoring COLWRAP_WIDTH={width:?}: expected a positive number"),
            }
        }

        if let Ok(tab_width) = env::var("COLWRAP_TAB_WIDTH") {
            match tab_width.trim().parse::<usize>() {
                Ok(tab_width) if tab_width > 0 => self.tab_width = tab_width,
                _ => tracing::warn!("Ignoring COLWRAP_TAB_WIDTH={tab_width:?}: expected a positive number"),
            }
        }

        if let Ok(flag) = env::var("COLWRAP_MINIMUM_RAGGEDNESS") {
            match parse_flag(&flag) {
                Some(enabled) => self.use_minimum_raggedness = enabled,
                None => tracing::warn!("Ignoring COLWRAP_MINIMUM_RAGGEDNESS={flag:?}: expected true or false"),
            }
        }

        if let Ok(types) = env::var("COLWRAP_PLAINTEXT_TYPES") {
            self.plaintext_file_types = types;
        }
    }

    /// Check whether `path` has one of the plain-text extensions.
    pub fn is_plaintext(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let dotted = format!(".{ext}");
        self.plaintext_file_types
            .split(',')
            .map(str::trim)
            .any(|t| t.eq_ignore_ascii_case(&dotted))
    }

    /// Wrap options for a file, falling back to `fallback_width` when no
    /// override is set.
    pub fn options_for(&self, path: Option<&Path>, fallback_width: usize) -> WrapOptions {
        let plaintext = path.is_some_and(|p| self.is_plaintext(p));
        let base = if plaintext { WrapOptions::plaintext() } else { WrapOptions::default() };
        WrapOptions {
            width: self.column_width_override.unwrap_or(fallback_width),
            tab_width: self.tab_width,
            use_minimum_raggedness: self.use_minimum_raggedness,
            ..base
        }
    }

    /// Build the wrapper suited to `path`.
    pub fn wrapper_for(&self, path: Option<&Path>, fallback_width: usize) -> Result<CodeWrapper> {
        CodeWrapper::new(self.options_for(path, fallback_width))
    }
}

/// Location of the settings file: `COLWRAP_SETTINGS` or the platform config dir.
pub fn settings_path() -> Option<PathBuf> {
    env::var("COLWRAP_SETTINGS").ok().map_or_else(
        || dirs::config_dir().map(|d| d.join(settings::APP_DIR).join(settings::FILE_NAME)),
        |path| Some(PathBuf::from(shellexpand::tilde(&path).to_string())),
    )
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn markdown_is_plaintext_by_default() {
        let settings = Settings::default();
        assert!(settings.is_plaintext(Path::new("README.md")));
        assert!(settings.is_plaintext(Path::new("docs/guide.ADOC")));
        assert!(!settings.is_plaintext(Path::new("src/main.rs")));
        assert!(!settings.is_plaintext(Path::new("Makefile")));
    }

    #[test]
    fn override_beats_fallback_width() {
        let settings = Settings { column_width_override: Some(72), ..Settings::default() };
        assert_eq!(settings.options_for(None, 100).width, 72);
        assert_eq!(Settings::default().options_for(None, 100).width, 100);
    }

    #[test]
    fn plaintext_files_get_prose_options() {
        let settings = Settings::default();
        let options = settings.options_for(Some(Path::new("notes.txt")), 80);
        assert!(options.preserve_leading_symbol_spacing);
        assert_eq!(options.comment_pattern, wrap::PLAINTEXT_COMMENT_PATTERN);

        let options = settings.options_for(Some(Path::new("lib.rs")), 80);
        assert!(!options.preserve_leading_symbol_spacing);
    }

    #[test]
    fn settings_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            column_width_override: Some(100),
            use_minimum_raggedness: true,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"use_minimum_raggedness": true}"#).unwrap();
        assert!(settings.use_minimum_raggedness);
        assert_eq!(settings.tab_width, wrap::DEFAULT_TAB_WIDTH);
    }

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("On"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
