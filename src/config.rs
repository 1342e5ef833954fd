use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Optional user settings loaded from `~/.pzkit/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub vacuum: Option<VacuumSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VacuumSettings {
    /// Replaces `<home>/Zomboid/Saves/Multiplayer`.
    pub saves_dir: Option<PathBuf>,
}

impl Settings {
    pub fn saves_dir(&self) -> Option<&PathBuf> {
        self.vacuum.as_ref().and_then(|v| v.saves_dir.as_ref())
    }
}

pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("could not determine the home directory"))
}

pub fn default_path() -> Result<Utf8PathBuf> {
    let path = home_dir()?.join(".pzkit").join("config.toml");
    Utf8PathBuf::from_path_buf(path).map_err(|path| anyhow!("{} is not valid UTF-8", path.display()))
}

/// Load the user settings, treating a missing file as defaults.
pub fn load() -> Result<Settings> {
    let path = default_path()?;
    if !path.exists() {
        return Ok(Settings::default());
    }
    load_from_path(&path)
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<Settings> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {path}"))
}
