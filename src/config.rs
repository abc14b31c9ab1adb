// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Studio configuration.
//!
//! Stored as YAML; every key is optional and falls back to its default.

use crate::ui::canvas::CanvasSize;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`StudioConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "OVERLAY_STUDIO_DATA_DIR";

/// Output canvas in pixels (16:9 by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width_px: 1920,
            height_px: 1080,
        }
    }
}

impl From<CanvasConfig> for CanvasSize {
    fn from(canvas: CanvasConfig) -> Self {
        CanvasSize::new(f64::from(canvas.width_px), f64::from(canvas.height_px))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudioConfig {
    /// Root for stored documents and media; image paths are kept relative to it.
    pub data_dir: PathBuf,
    pub canvas: CanvasConfig,
    /// Shift applied to duplicated slide elements, in percent.
    pub duplicate_offset_pct: f64,
    /// Smallest width/height an interactive resize can produce.
    pub min_size_pct: f64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            canvas: CanvasConfig::default(),
            duplicate_offset_pct: 2.0,
            min_size_pct: 1.0,
        }
    }
}

impl StudioConfig {
    /// Read a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_yaml::from_str(&yaml)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Write the config back as YAML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            log::info!("Data directory overridden to {}", dir);
            self.data_dir = PathBuf::from(dir);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studio.yaml");
        std::fs::write(&path, "canvas:\n  widthPx: 1280\n").unwrap();

        let config = StudioConfig::load(&path).unwrap();
        assert_eq!(config.canvas.width_px, 1280);
        assert_eq!(config.canvas.height_px, 1080);
        assert_eq!(config.duplicate_offset_pct, 2.0);
        assert_eq!(config.min_size_pct, 1.0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studio.yaml");
        let config = StudioConfig {
            data_dir: PathBuf::from("/srv/studio"),
            ..StudioConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(StudioConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(StudioConfig::load(Path::new("/definitely/not/here.yaml")).is_err());
    }

    #[test]
    fn test_env_override() {
        let config = StudioConfig::default().with_overrides(|key| {
            (key == DATA_DIR_ENV).then(|| "/tmp/studio".to_string())
        });
        assert_eq!(config.data_dir, PathBuf::from("/tmp/studio"));

        let unchanged = StudioConfig::default().with_overrides(|_| Some(String::new()));
        assert_eq!(unchanged.data_dir, PathBuf::from("data"));
    }
}
