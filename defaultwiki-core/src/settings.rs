use std::{
    fmt,
    path::{Path, PathBuf},
    sync::RwLock,
};

use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parsing(toml::de::Error),
    Serializing(toml::ser::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Parsing(e) => write!(f, "TOML parse error: {}", e),
            SettingsError::Serializing(e) => write!(f, "TOML encode error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(value: std::io::Error) -> Self {
        SettingsError::Io(value)
    }
}

impl From<toml::de::Error> for SettingsError {
    fn from(value: toml::de::Error) -> Self {
        SettingsError::Parsing(value)
    }
}

impl From<toml::ser::Error> for SettingsError {
    fn from(value: toml::ser::Error) -> Self {
        SettingsError::Serializing(value)
    }
}

/// Wiki-wide settings edited from the administration page.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "Name")]
    pub name: String,
}

impl Settings {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let data = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&data)?;

        Ok(settings)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let data = toml::to_string(self)?;
        std::fs::write(path, data)?;

        Ok(())
    }
}

/// The settings file plus the copy currently in effect.
///
/// Handlers read a snapshot with [`SettingsStore::current`]; the only way the
/// snapshot changes is [`SettingsStore::update`] or [`SettingsStore::reload`].
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    current: RwLock<Settings>,
}

impl SettingsStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let current = RwLock::new(load_or_default(&path));
        Self { path, current }
    }

    /// Settings stored next to the pages in `data_root`.
    pub fn in_data_root<P: AsRef<Path>>(data_root: P) -> Self {
        Self::open(data_root.as_ref().join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Settings {
        match self.current.read() {
            Ok(settings) => settings.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Persist `settings`, then re-read the file so `current` reflects what
    /// is actually on disk.
    pub fn update(&self, settings: &Settings) -> Result<(), SettingsError> {
        settings.write(&self.path)?;
        self.reload();
        Ok(())
    }

    pub fn reload(&self) {
        let fresh = load_or_default(&self.path);
        match self.current.write() {
            Ok(mut current) => *current = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
    }
}

fn load_or_default(path: &Path) -> Settings {
    match Settings::read(path) {
        Ok(settings) => settings,
        Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            Settings::default()
        }
        Err(e) => {
            log::warn!("Ignoring settings in {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::in_data_root(dir.path());
        assert_eq!(store.current(), Settings::default());
    }

    #[test]
    fn test_reads_name_key() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "Name = \"My Wiki\"\n").unwrap();

        let store = SettingsStore::in_data_root(dir.path());
        assert_eq!(store.current().name, "My Wiki");
    }

    #[test]
    fn test_unparsable_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "Name = [not toml").unwrap();

        let store = SettingsStore::in_data_root(dir.path());
        assert_eq!(store.current(), Settings::default());
    }

    #[test]
    fn test_update_writes_and_reloads() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::in_data_root(dir.path());

        store
            .update(&Settings {
                name: "Notes".to_string(),
            })
            .unwrap();

        assert_eq!(store.current().name, "Notes");
        let on_disk = std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap();
        assert!(on_disk.contains("Name = \"Notes\""), "{on_disk}");
    }

    #[test]
    fn test_reload_picks_up_external_edits() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::in_data_root(dir.path());

        std::fs::write(store.path(), "Name = \"Edited\"").unwrap();
        assert_eq!(store.current().name, "");

        store.reload();
        assert_eq!(store.current().name, "Edited");
    }
}
