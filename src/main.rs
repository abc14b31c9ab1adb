// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay Studio command line.
//!
//! Loads a scene file (JSON or YAML) and logs the draw commands a renderer
//! would receive for it.

use anyhow::{bail, Context, Result};
use overlay_studio::io::serialization;
use overlay_studio::models::scene::Scene;
use overlay_studio::render::scene::{compose, OfflineSources};
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: overlay-studio <scene.json|scene.yaml>");
    };

    let scene: Scene = serialization::import(&path)
        .with_context(|| format!("loading scene {}", path.display()))?;
    log::info!(
        "Loaded scene '{}' ({} layers) from {}",
        scene.name,
        scene.layers.len(),
        path.display()
    );

    for command in compose(&scene, &OfflineSources) {
        log::info!("{}", serde_json::to_string(&command)?);
    }

    Ok(())
}
