use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The persisted city selection, read at startup and written on change.
///
/// The core only needs get/set over a single string; hosts decide the
/// medium. [`FileStore`] is the disk-backed default, [`MemoryStore`] fits
/// tests and hosts without persistent storage.
pub trait SelectionStore {
    fn get(&self) -> Option<String>;
    fn set(&mut self, city_name: &str) -> Result<()>;
}

/// Top-level settings stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Display name of the last selected city.
    pub city_name: Option<String>,
}

impl Settings {
    /// Load settings from the platform config directory, or return an
    /// empty default if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no settings file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the settings file.
    pub fn settings_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skylight", "skylight")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("settings.toml"))
    }
}

/// Disk-backed selection store writing through to a settings file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    settings: Settings,
}

impl FileStore {
    /// Open the store at the platform default location.
    pub fn open_default() -> Result<Self> {
        Self::open(Settings::settings_file_path()?)
    }

    pub fn open(path: PathBuf) -> Result<Self> {
        let settings = Settings::load_from(&path)?;
        Ok(Self { path, settings })
    }
}

impl SelectionStore for FileStore {
    fn get(&self) -> Option<String> {
        self.settings.city_name.clone()
    }

    fn set(&mut self, city_name: &str) -> Result<()> {
        self.settings.city_name = Some(city_name.to_string());
        self.settings.save_to(&self.path)
    }
}

/// In-memory selection store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    city_name: Option<String>,
}

impl SelectionStore for MemoryStore {
    fn get(&self) -> Option<String> {
        self.city_name.clone()
    }

    fn set(&mut self, city_name: &str) -> Result<()> {
        self.city_name = Some(city_name.to_string());
        Ok(())
    }
}
