//! Application configuration.
//!
//! Every field has a default, so an empty YAML file (or none at all) is a
//! valid configuration:
//!
//! ```yaml
//! settings_path: /tmp/kp-mpl.txt
//! runlist_path: /tmp/runlist.txt
//! plot_path: /tmp/kp.png
//! plot_name_path: /tmp/kp-name.txt
//! pixel_scale: 1.0
//! fallback_size: [1600, 1200]
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use kp_ingest::RunlistStore;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Render directives, one per line.
    pub settings_path: PathBuf,
    /// Loaded run labels; `#`-prefixed lines are hidden.
    pub runlist_path: PathBuf,
    /// Rendered grid image.
    pub plot_path: PathBuf,
    /// Receives the pattern of the last rendered figure.
    pub plot_name_path: PathBuf,
    /// Multiplier from terminal pixels to figure pixels.
    pub pixel_scale: f64,
    /// Terminal size used when the terminal reports no pixel dimensions.
    pub fallback_size: [u32; 2],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from("/tmp/kp-mpl.txt"),
            runlist_path: PathBuf::from("/tmp/runlist.txt"),
            plot_path: PathBuf::from("/tmp/kp.png"),
            plot_name_path: PathBuf::from("/tmp/kp-name.txt"),
            pixel_scale: 1.0,
            fallback_size: [1600, 1200],
        }
    }
}

impl Config {
    /// Read a YAML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults unless a config file is given.
    pub fn load_or_default(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if !(self.pixel_scale.is_finite() && self.pixel_scale > 0.0) {
            return Err(AppError::Config(format!(
                "pixel_scale must be positive, got {}",
                self.pixel_scale
            )));
        }
        if self.fallback_size.contains(&0) {
            return Err(AppError::Config(
                "fallback_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Create an empty settings file if there is none yet.
    pub fn ensure_settings_file(&self) -> AppResult<()> {
        if let Some(parent) = self.settings_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.settings_path)
            .map_err(|source| AppError::SettingsRead {
                path: self.settings_path.clone(),
                source,
            })?;
        Ok(())
    }

    pub fn runlist(&self) -> RunlistStore {
        RunlistStore::new(&self.runlist_path)
    }
}
