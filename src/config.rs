//! Configuration file support.
//!
//! sortbot works out of the box with a built-in category table, but both the
//! table and the set of files the organizer skips can be customized via a
//! TOML configuration file:
//!
//! ```toml
//! [categories]
//! Images = [".jpg", ".png"]
//! Archives = [".zip", ".tar"]
//!
//! [exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.part"]
//! ```
//!
//! When a `[categories]` table is present it replaces the built-in table
//! entirely. The run log file is always skipped, whatever the configuration
//! says.

use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::category::CategoryTable;
use crate::organizer::LOG_FILE_NAME;

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    NotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    Invalid(String),
    /// Invalid glob pattern in the exclude rules.
    InvalidGlobPattern(String),
    /// IO error while reading the configuration file.
    Io(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::Io(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Category name to extension list. Empty means "use the built-in table".
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,

    /// Files the organizer leaves in place.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for skipping files during a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to skip (e.g. "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to skip (e.g. "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl OrganizerConfig {
    /// Load configuration, with fallback to defaults.
    ///
    /// Lookup order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. `.sortbotrc.toml` in the current directory
    /// 3. `~/.config/sortbot/config.toml`
    /// 4. Built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error only if an explicitly provided file cannot be read
    /// or parsed; missing fallback locations are not an error.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".sortbotrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sortbot")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Build the category table: the configured `[categories]` table when
    /// present, the built-in table otherwise.
    pub fn category_table(&self) -> CategoryTable {
        if self.categories.is_empty() {
            return CategoryTable::default();
        }

        let mut table = CategoryTable::empty();
        for (category, extensions) in &self.categories {
            let refs: Vec<&str> = extensions.iter().map(String::as_str).collect();
            table.register(category, &refs);
        }
        table
    }

    /// Pre-compile the exclude rules for matching during a run.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob pattern is invalid.
    pub fn compile_excludes(&self) -> Result<CompiledExcludes, ConfigError> {
        CompiledExcludes::new(&self.exclude)
    }
}

/// Compiled exclude rules.
///
/// Filenames are matched exactly, patterns via pre-compiled globs. The run
/// log file name is always a member of the exact set.
pub struct CompiledExcludes {
    filenames: HashSet<String>,
    patterns: Vec<Pattern>,
}

impl CompiledExcludes {
    fn new(rules: &ExcludeRules) -> Result<Self, ConfigError> {
        let patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut filenames: HashSet<String> = rules.filenames.iter().cloned().collect();
        // The run log lives in the organized folder and must never be moved.
        filenames.insert(LOG_FILE_NAME.to_string());

        Ok(Self {
            filenames,
            patterns,
        })
    }

    /// Whether a file (by name; only immediate entries are considered)
    /// should be skipped.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        if self.filenames.contains(file_name) {
            return true;
        }
        self.patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
    }
}

impl Default for CompiledExcludes {
    fn default() -> Self {
        Self::new(&ExcludeRules::default()).expect("default exclude rules always compile")
    }
}
