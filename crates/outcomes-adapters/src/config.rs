//! Configuration management for outcomes
//!
//! Stores settings in ~/.config/outcomes/config.json

use anyhow::{Context, Result};
use outcomes_core::verdict::DEFAULT_SWAP_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Remaining upload count granted by "try another document".
pub const DEFAULT_REPLENISH_UPLOAD_COUNT: u32 = 6;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const MAX_FETCH_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Warning messages longer than this are shown as details, not summary.
    pub warning_swap_threshold: usize,
    pub replenish_upload_count: u32,
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            warning_swap_threshold: DEFAULT_SWAP_THRESHOLD,
            replenish_upload_count: DEFAULT_REPLENISH_UPLOAD_COUNT,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl Config {
    fn sanitize(&mut self) {
        self.warning_swap_threshold = self.warning_swap_threshold.max(1);
        self.fetch_timeout_secs = self.fetch_timeout_secs.clamp(1, MAX_FETCH_TIMEOUT_SECS);
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("outcomes"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load config from the default location, or return defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load config from `path`. A corrupt file is moved aside and defaults
    /// are returned.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str::<Config>(&content) {
            Ok(mut config) => {
                config.sanitize();
                config
            }
            Err(err) => {
                preserve_corrupt_config(path, &content);
                warn!(
                    path = %path.display(),
                    error = %err,
                    "config file was corrupted; a backup was saved and defaults were loaded"
                );
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("Could not determine config directory")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let mut sanitized = self.clone();
        sanitized.sanitize();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        }

        let content =
            serde_json::to_string_pretty(&sanitized).context("Failed to serialize config")?;

        #[cfg(unix)]
        {
            write_config_atomic(path, &content).context("Failed to write config")?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, content).context("Failed to write config")?;
        }

        Ok(())
    }
}

fn preserve_corrupt_config(path: &Path, content: &str) {
    let corrupt_path = path.with_extension("json.corrupt");
    if fs::rename(path, &corrupt_path).is_err() {
        let _ = fs::write(&corrupt_path, content);
    }
}

#[cfg(unix)]
fn write_config_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    let tmp_path = path.with_extension("tmp");
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)?;

    if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
        warn!(error = %e, "failed to set temp config file permissions");
    }

    file.write_all(content.as_bytes())?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    Ok(())
}
