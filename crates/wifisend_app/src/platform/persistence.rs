use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use transfer_logging::{transfer_info, transfer_warn};

const SETTINGS_FILENAME: &str = "wifisend_settings.ron";

/// Overrides the settings file location.
pub(crate) const SETTINGS_PATH_ENV: &str = "WIFISEND_CONFIG";

#[derive(Debug, thiserror::Error)]
pub(crate) enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
struct PersistedSettings {
    #[serde(default)]
    wifi_address: Option<String>,
}

/// Durable configuration: a RON file holding `wifi_address`.
#[derive(Debug)]
pub(crate) struct SettingsStore {
    path: PathBuf,
    settings: PersistedSettings,
}

impl SettingsStore {
    pub(crate) fn default_path() -> PathBuf {
        std::env::var_os(SETTINGS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".").join(SETTINGS_FILENAME))
    }

    /// Reads the file at `path`. A missing or unreadable file yields
    /// defaults; the store still writes to `path` later.
    pub(crate) fn load(path: PathBuf) -> Self {
        let settings = match fs::read_to_string(&path) {
            Ok(text) => match ron::from_str::<PersistedSettings>(&text) {
                Ok(settings) => {
                    transfer_info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(err) => {
                    transfer_warn!("Failed to parse settings from {:?}: {}", path, err);
                    PersistedSettings::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => PersistedSettings::default(),
            Err(err) => {
                transfer_warn!("Failed to read settings from {:?}: {}", path, err);
                PersistedSettings::default()
            }
        };
        Self { path, settings }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// The stored address, if one was ever saved.
    pub(crate) fn get_wifi_address(&self) -> Option<&str> {
        self.settings.wifi_address.as_deref()
    }

    pub(crate) fn set_wifi_address(&mut self, address: &str) -> Result<(), SettingsError> {
        let mut next = self.settings.clone();
        next.wifi_address = Some(address.to_string());
        write_atomically(&self.path, &next)?;
        self.settings = next;
        transfer_info!("Saved wifi_address={} to {:?}", address, self.path);
        Ok(())
    }
}

// Write a sibling temp file and rename it over the target, so a crash never
// leaves a half-written settings file behind.
fn write_atomically(path: &Path, settings: &PersistedSettings) -> Result<(), SettingsError> {
    let content = ron::ser::to_string_pretty(settings, ron::ser::PrettyConfig::new())?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|err| SettingsError::Io(err.error))?;
    Ok(())
}
