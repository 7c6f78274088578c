//! `settings.toml` persistence for the terminal reader.
//!
//! Default location is `<config dir>/readily/settings.toml`, e.g.
//! `~/.config/readily/settings.toml` on Linux.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::debug;
use readily_core::settings::{ReaderSettings, SettingsStore};

const APP_NAME: &str = "readily";
const SETTINGS_FILE: &str = "settings.toml";

pub(super) fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(SETTINGS_FILE)
}

pub(super) struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub(super) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for TomlSettingsStore {
    type Error = anyhow::Error;

    fn load(&mut self) -> Result<Option<ReaderSettings>> {
        if !self.path.exists() {
            debug!("settings: none at {}", self.path.display());
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let settings: ReaderSettings = toml::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(settings))
    }

    fn save(&mut self, settings: &ReaderSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(settings)?;
        fs::write(&self.path, content)
            .with_context(|| format!("writing {}", self.path.display()))?;
        debug!("settings: saved wpm={} to {}", settings.wpm, self.path.display());
        Ok(())
    }
}
