//! Theme
//!
//! Route classification and theme resolution. Public marketing routes are
//! always light; dashboard routes restore the stored preference.

use std::{fmt, fs, io, path::PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

/// Preference key under which the theme is stored.
pub const THEME_KEY: &str = "theme";

/// Path prefix of authenticated dashboard routes.
pub const DASHBOARD_PREFIX: &str = "/dashboard";

/// Colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light theme.
    #[default]
    Light,

    /// Dark theme.
    Dark,
}

impl Theme {
    /// Stored string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a stored value; unknown values are `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a route belongs to the public site or the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Landing, pricing, contact, login and other marketing pages.
    Public,

    /// Authenticated dashboard pages.
    Dashboard,
}

impl RouteClass {
    /// Classify a URL path.
    #[must_use]
    pub fn classify(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();

        match path.strip_prefix(DASHBOARD_PREFIX) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => RouteClass::Dashboard,
            _ => RouteClass::Public,
        }
    }
}

/// Theme to apply for a route class and stored preference.
#[must_use]
pub fn resolve_theme(class: RouteClass, stored: Option<Theme>) -> Theme {
    match class {
        RouteClass::Public => Theme::Light,
        RouteClass::Dashboard => stored.unwrap_or_default(),
    }
}

/// Errors raised by preference stores.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// IO error reading or writing the preferences file
    #[error("Failed to access preferences file: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing or serialisation error
    #[error("Failed to parse preferences: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// String-keyed durable UI preferences.
pub trait PreferenceStore {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns a `PreferencesError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PreferencesError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns a `PreferencesError` if the backing storage cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferencesError>;
}

/// Read the stored theme, ignoring unknown values.
///
/// # Errors
///
/// Returns a `PreferencesError` if the store cannot be read.
pub fn stored_theme(store: &impl PreferenceStore) -> Result<Option<Theme>, PreferencesError> {
    Ok(store.get(THEME_KEY)?.as_deref().and_then(Theme::parse))
}

/// Persist a theme choice.
///
/// # Errors
///
/// Returns a `PreferencesError` if the store cannot be written.
pub fn store_theme(store: &mut impl PreferenceStore, theme: Theme) -> Result<(), PreferencesError> {
    store.set(THEME_KEY, theme.as_str())
}

/// Resolve the theme for a path from a preference store.
///
/// The store is only consulted for dashboard routes.
///
/// # Errors
///
/// Returns a `PreferencesError` if the store cannot be read.
pub fn theme_for_path(path: &str, store: &impl PreferenceStore) -> Result<Theme, PreferencesError> {
    let class = RouteClass::classify(path);

    let stored = match class {
        RouteClass::Public => None,
        RouteClass::Dashboard => stored_theme(store)?,
    };

    let theme = resolve_theme(class, stored);

    debug!(path, ?class, %theme, "theme resolved");

    Ok(theme)
}

/// In-memory preference store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: FxHashMap<String, String>,
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>, PreferencesError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferencesError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// YAML file preference store. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    /// Create a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FilePreferences { path: path.into() }
    }

    fn load(&self) -> Result<FxHashMap<String, String>, PreferencesError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(FxHashMap::default()),
            Ok(contents) => Ok(serde_norway::from_str(&contents)?),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(FxHashMap::default()),
            Err(error) => Err(error.into()),
        }
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>, PreferencesError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferencesError> {
        let mut values = self.load()?;

        values.insert(key.to_string(), value.to_string());

        fs::write(&self.path, serde_norway::to_string(&values)?)?;

        Ok(())
    }
}
