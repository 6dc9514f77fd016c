use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only view over a `KEY=VALUE` file holding connection defaults.
///
/// Nothing the user does during a session is written back.
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load a single value by key. Blank values count as missing.
    pub fn load_value(&self, key: &str) -> Option<String> {
        self.load_all()
            .remove(key)
            .filter(|value| !value.is_empty())
    }

    /// Load all key-value pairs; comment lines (`#`) are skipped.
    pub fn load_all(&self) -> HashMap<String, String> {
        let mut state = HashMap::new();
        if let Ok(contents) = fs::read_to_string(&self.path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.starts_with('#') {
                    continue;
                }
                if let Some((k, v)) = line.split_once('=') {
                    state.insert(k.trim().to_string(), v.trim().to_string());
                }
            }
        }
        state
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
