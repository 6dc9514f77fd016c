use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::config::consts::{DEFAULT_FETCH_CONCURRENCY, DEFAULT_TOAST_MS};

/// Tunables that rarely change between sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fetch_concurrency: default_fetch_concurrency(),
            toast_ms: default_toast_ms(),
        }
    }
}

/// Load settings from a TOML file.
pub fn load_settings_from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Settings> {
    let s = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&s)?;
    Ok(settings)
}

fn default_fetch_concurrency() -> usize {
    DEFAULT_FETCH_CONCURRENCY
}

fn default_toast_ms() -> u64 {
    DEFAULT_TOAST_MS
}
