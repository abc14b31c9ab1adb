// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file helpers.
//!
//! Picking files is left to the host through [`MediaPicker`]. Picked paths
//! inside the data directory are stored relative to it so documents move
//! between machines with the media folder.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];

/// Whether the path names a supported image file (case-insensitive).
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Host file dialog.
pub trait MediaPicker {
    /// Ask the operator for an image. `None` when the dialog is cancelled.
    fn pick_image(&self) -> Result<Option<PathBuf>>;
}

/// Path as it should be stored in a document.
///
/// Paths under `data_dir` become relative with `/` separators. Anything else
/// is kept as given.
pub fn relativize_media_path(path: &Path, data_dir: &Path) -> String {
    match path.strip_prefix(data_dir) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => {
            log::warn!(
                "Media {} is outside {}; storing absolute path",
                path.display(),
                data_dir.display()
            );
            path.to_string_lossy().into_owned()
        }
    }
}

/// Run the picker and return a storable image path.
pub fn pick_image_path(picker: &dyn MediaPicker, data_dir: &Path) -> Result<Option<String>> {
    let Some(path) = picker.pick_image()? else {
        return Ok(None);
    };
    if !is_image_path(&path) {
        bail!("Unsupported image type: {}", path.display());
    }
    Ok(Some(relativize_media_path(&path, data_dir)))
}
