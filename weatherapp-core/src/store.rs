//! Persistence for the last searched city.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::config::project_dirs;

/// Key under which the last searched city is stored.
pub const LAST_SEARCHED_CITY_KEY: &str = "last_searched_city";

/// Process-local key-value store for user preferences.
///
/// Writes are fire-and-forget: implementations log failures instead of
/// returning them.
pub trait PreferenceStore: Send + Sync {
    fn save_last_city(&self, city: &str);

    fn last_city(&self) -> Option<String>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    last_searched_city: Option<String>,
}

/// TOML-backed store that survives process restarts.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(project_dirs()?.data_dir().join("preferences.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences: {}", self.path.display()))
    }

    fn write(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(prefs).context("Failed to serialize preferences")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn save_last_city(&self, city: &str) {
        let mut prefs = self.read().unwrap_or_else(|err| {
            warn!("{err:#}; overwriting");
            Preferences::default()
        });
        prefs.last_searched_city = Some(city.to_owned());

        if let Err(err) = self.write(&prefs) {
            warn!(key = LAST_SEARCHED_CITY_KEY, "{err:#}");
        }
    }

    fn last_city(&self) -> Option<String> {
        match self.read() {
            Ok(prefs) => prefs.last_searched_city,
            Err(err) => {
                warn!(key = LAST_SEARCHED_CITY_KEY, "{err:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_city() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("preferences.toml"));

        assert_eq!(store.last_city(), None);
    }

    #[test]
    fn saved_city_survives_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("preferences.toml");

        FilePreferenceStore::new(&path).save_last_city("Dallas");
        let reopened = FilePreferenceStore::new(&path);

        assert_eq!(reopened.last_city().as_deref(), Some("Dallas"));
    }

    #[test]
    fn later_save_replaces_earlier_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("preferences.toml"));

        store.save_last_city("Dallas");
        store.save_last_city("Austin");

        assert_eq!(store.last_city().as_deref(), Some("Austin"));
    }

    #[test]
    fn file_uses_well_known_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("preferences.toml"));

        store.save_last_city("Dallas");

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("last_searched_city = \"Dallas\""), "{contents}");
    }

    #[test]
    fn corrupt_file_reads_as_empty_and_is_repaired_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "not = [valid").unwrap();
        let store = FilePreferenceStore::new(&path);

        assert_eq!(store.last_city(), None);

        store.save_last_city("Dallas");
        assert_eq!(store.last_city().as_deref(), Some("Dallas"));
    }
}
