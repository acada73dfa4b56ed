use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Per-project state carried between runs. Every field defaults so a
/// partial or missing file still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(default)]
    pub name: String,
    /// Local build counter. Increments every run, resets to 1 when a dirty
    /// tree differs from the one recorded last run.
    #[serde(default)]
    pub localcnt: u64,
    /// Unix timestamp of the last run.
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub hostname: String,
    /// Descriptive string observed last run, or the failure sentinel.
    #[serde(default)]
    pub gitrev: String,
}

impl State {
    /// Loads prior state. A missing, unreadable, or malformed file is
    /// treated as a first run.
    pub fn load_from(path: &Path) -> State {
        fs::read_to_string(path)
            .ok()
            .and_then(|data| serde_yaml_ng::from_str(&data).ok())
            .unwrap_or_default()
    }

    /// Saves state atomically: written to a temp file in the same
    /// directory, then renamed over the target.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let dir = match path.parent().filter(|d| !d.as_os_str().is_empty()) {
            Some(d) => {
                fs::create_dir_all(d)?;
                d.to_path_buf()
            }
            None => PathBuf::from("."),
        };

        let data = serde_yaml_ng::to_string(self)?;
        let mut tmp =
            tempfile::NamedTempFile::new_in(&dir).context("creating temp file for state save")?;
        tmp.write_all(data.as_bytes())
            .context("writing state to temp file")?;
        tmp.persist(path).context("renaming temp file over state")?;
        Ok(())
    }
}

/// Resolves the state file path for a project. Accepts injectable home for testing.
pub fn default_state_path_with(name: &str, home: Option<&Path>) -> Result<PathBuf> {
    let home = home.context("cannot determine home directory")?;
    Ok(home.join(format!(".{}.yaml", name)))
}

pub fn default_state_path(name: &str) -> Result<PathBuf> {
    default_state_path_with(name, dirs::home_dir().as_deref())
}
