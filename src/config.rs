//! Configuration file support
//!
//! Loads settings from ~/.mdconceal.toml (or %USERPROFILE%\.mdconceal.toml
//! on Windows).
//!
//! Example:
//! ```text
//! # mdconceal configuration
//! enabled = true
//! tab-size = 4
//! languages = ["markdown", "md", "mdx"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::{debug, warn};

use crate::conceal::{effective_tab_size, DEFAULT_TAB_SIZE};
use crate::error::Result;

/// Language ids decorated when none are configured
const DEFAULT_LANGUAGES: [&str; 3] = ["markdown", "md", "mdx"];

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Whether decorations are applied at all
    pub enabled: bool,
    /// Tab width used for list nesting levels
    pub tab_size: usize,
    /// Document language ids the engine runs on
    pub languages: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            tab_size: DEFAULT_TAB_SIZE,
            languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".mdconceal.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".mdconceal.toml"))
        }
    }

    /// Load configuration from the default path, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        let table: Table = contents.parse()?;
        let mut config = Config::default();
        config.apply(&table);
        Ok(config)
    }

    /// Apply settings from a parsed table; unknown keys are ignored
    fn apply(&mut self, table: &Table) {
        if let Some(value) = table.get("enabled").and_then(Value::as_bool) {
            self.enabled = value;
        }

        if let Some(value) = table.get("tab-size") {
            self.tab_size = tab_size_from_value(value);
        }

        if let Some(Value::Array(items)) = table.get("languages") {
            self.languages = items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.to_lowercase())
                .collect();
        }
    }

    /// Check if documents of a language should be decorated
    pub fn handles_language(&self, language: &str) -> bool {
        self.enabled && self.languages.iter().any(|l| l.eq_ignore_ascii_case(language))
    }

    /// Guess a language id from a file extension
    pub fn language_for_path(path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "md" | "markdown" | "mkd" => Some("markdown".to_string()),
            "mdx" => Some("mdx".to_string()),
            _ => None,
        }
    }
}

/// Read a tab size setting; anything non-numeric means the default
///
/// Numbers go through [`effective_tab_size`], so 0 is the default and
/// large widths are capped.
pub fn tab_size_from_value(value: &Value) -> usize {
    let parsed = match value {
        Value::Integer(n) => usize::try_from(*n).ok(),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    parsed.map_or(DEFAULT_TAB_SIZE, effective_tab_size)
}
