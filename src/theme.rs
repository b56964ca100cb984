//! Light/dark theme resolution.
//!
//! The theme is resolved once at startup from the stored preference (key
//! `theme`) or, when nothing is stored, from the platform preference. There
//! is no live subscription to later changes, and nothing here writes the
//! stored preference.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::dom::DocumentRoot;

/// Storage key holding the preference.
pub const STORAGE_KEY: &str = "theme";
/// Class set on the document root in dark mode.
pub const DARK_CLASS: &str = "dark";

/// Visual mode of the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the theme: a stored value wins, otherwise the platform decides.
///
/// Only a stored `"dark"` selects dark mode; any other non-empty stored value
/// selects light mode even if the platform prefers dark. An empty stored value
/// counts as nothing stored.
#[must_use]
pub fn resolve_theme(stored: Option<&str>, platform_prefers_dark: bool) -> ThemeMode {
    match stored {
        Some("dark") => ThemeMode::Dark,
        Some("") | None if platform_prefers_dark => ThemeMode::Dark,
        Some(_) | None => ThemeMode::Light,
    }
}

/// Apply the mode to the document root.
pub fn apply_theme<R: DocumentRoot + ?Sized>(root: &mut R, mode: ThemeMode) {
    match mode {
        ThemeMode::Dark => root.add_class(DARK_CLASS),
        ThemeMode::Light => root.remove_class(DARK_CLASS),
    }
}

/// Read the preference, resolve it and apply it, once.
pub fn init_theme<S, R>(store: &S, platform_prefers_dark: bool, root: &mut R) -> ThemeMode
where
    S: PreferenceStore + ?Sized,
    R: DocumentRoot + ?Sized,
{
    let stored = store.get(STORAGE_KEY);
    let mode = resolve_theme(stored.as_deref(), platform_prefers_dark);
    apply_theme(root, mode);

    tracing::debug!(
        name: "theme.applied",
        stored = ?stored,
        platform_prefers_dark,
        mode = %mode,
        "Theme applied"
    );
    mode
}

/// Failure to load a preference file.
#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("failed to read preferences from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("preferences in {path} are not a JSON object: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only key/value preference storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
}

/// Preferences held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Preferences loaded from a JSON object on disk.
///
/// A missing file is an empty store. Non-string values are ignored.
#[derive(Debug, Clone, Default)]
pub struct FilePreferences {
    values: HashMap<String, String>,
}

impl FilePreferences {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferenceError> {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(PreferenceError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw)
            .map_err(|source| PreferenceError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let values = object
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect();
        Ok(Self { values })
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
