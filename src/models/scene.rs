// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene graph: an ordered stack of layers.
//!
//! Layers paint in array order, first entry at the bottom. [`SceneGraph`] owns
//! one scene plus the current selection and exposes every mutation the editor
//! performs on it.

use super::content::LayerContent;
use super::unique_id;
use crate::error::{StudioError, StudioResult};
use crate::util::geometry::{self, Frame, FramePatch, Point};
use serde::{Deserialize, Serialize};

fn default_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

/// A positioned visual element of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content: LayerContent,
    #[serde(flatten)]
    pub frame: Frame,
    /// 0.0 to 1.0.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

/// Ordered stack of layers composited together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layers: Vec::new(),
        }
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    fn index_of(&self, id: &str) -> StudioResult<usize> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| StudioError::not_found("layer", id))
    }

    fn layer_mut(&mut self, id: &str) -> StudioResult<&mut Layer> {
        let idx = self.index_of(id)?;
        Ok(&mut self.layers[idx])
    }
}

/// Array-order restack of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerMove {
    Up,
    Down,
    Top,
    Bottom,
}

/// A scene being edited, with its selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    scene: Scene,
    selected: Option<String>,
}

impl SceneGraph {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            selected: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.scene.layer(id)
    }

    /// Select a layer by id.
    pub fn select(&mut self, id: &str) -> StudioResult<()> {
        self.scene.index_of(id)?;
        self.selected = Some(id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Replace the whole scene, e.g. after undo. The selection survives only if
    /// the selected layer still exists.
    pub fn restore(&mut self, scene: Scene) {
        if let Some(id) = &self.selected {
            if scene.layer(id).is_none() {
                self.selected = None;
            }
        }
        self.scene = scene;
    }

    /// Append a full-canvas layer on top of the stack and select it.
    pub fn add_layer(&mut self, content: LayerContent, name: Option<&str>) -> String {
        let id = unique_id("layer", |candidate| self.scene.layer(candidate).is_some());
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| content.default_name());
        self.scene.layers.push(Layer {
            id: id.clone(),
            name,
            content,
            frame: Frame::FULL,
            opacity: 1.0,
            visible: true,
        });
        self.selected = Some(id.clone());
        log::info!(
            "Added layer {} to scene {}, total: {}",
            id,
            self.scene.id,
            self.scene.layers.len()
        );
        id
    }

    /// Remove a layer, dropping the selection if it pointed at it.
    pub fn remove_layer(&mut self, id: &str) -> StudioResult<Layer> {
        let idx = self.scene.index_of(id)?;
        let removed = self.scene.layers.remove(idx);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        log::info!(
            "Removed layer {}, total: {}",
            id,
            self.scene.layers.len()
        );
        Ok(removed)
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> StudioResult<()> {
        self.scene.layer_mut(id)?.visible = visible;
        Ok(())
    }

    /// Overwrite the geometry fields present in `patch`. No range checks.
    pub fn update_geometry(&mut self, id: &str, patch: FramePatch) -> StudioResult<()> {
        let layer = self.scene.layer_mut(id)?;
        layer.frame = layer.frame.apply(patch);
        Ok(())
    }

    /// Replace a layer's content wholesale.
    pub fn set_content(&mut self, id: &str, content: LayerContent) -> StudioResult<()> {
        let layer = self.scene.layer_mut(id)?;
        log::debug!(
            "Layer {} content {:?} -> {:?}",
            id,
            layer.content.badge(),
            content.badge()
        );
        layer.content = content;
        Ok(())
    }

    pub fn rename_layer(&mut self, id: &str, name: &str) -> StudioResult<()> {
        self.scene.layer_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_opacity(&mut self, id: &str, opacity: f64) -> StudioResult<()> {
        self.scene.layer_mut(id)?.opacity = opacity;
        Ok(())
    }

    /// Move a layer within the paint order. Returns `false` when it is already
    /// at the requested end.
    pub fn move_layer(&mut self, id: &str, movement: LayerMove) -> StudioResult<bool> {
        let idx = self.scene.index_of(id)?;
        let last = self.scene.layers.len() - 1;
        let target = match movement {
            LayerMove::Up => (idx < last).then_some(idx + 1),
            LayerMove::Down => idx.checked_sub(1),
            LayerMove::Top => (idx < last).then_some(last),
            LayerMove::Bottom => (idx > 0).then_some(0),
        };
        let Some(target) = target else {
            return Ok(false);
        };
        let layer = self.scene.layers.remove(idx);
        self.scene.layers.insert(target, layer);
        Ok(true)
    }

    pub fn move_layer_up(&mut self, id: &str) -> StudioResult<bool> {
        self.move_layer(id, LayerMove::Up)
    }

    pub fn move_layer_down(&mut self, id: &str) -> StudioResult<bool> {
        self.move_layer(id, LayerMove::Down)
    }

    /// Copy a layer directly above the original and select the copy.
    pub fn duplicate_layer(&mut self, id: &str) -> StudioResult<String> {
        let idx = self.scene.index_of(id)?;
        let new_id = unique_id("layer", |candidate| self.scene.layer(candidate).is_some());
        let mut copy = self.scene.layers[idx].clone();
        copy.id = new_id.clone();
        copy.name = format!("{} copy", copy.name);
        self.scene.layers.insert(idx + 1, copy);
        self.selected = Some(new_id.clone());
        Ok(new_id)
    }

    /// Topmost visible layer under a percentage point.
    pub fn layer_at(&self, point: Point) -> Option<&Layer> {
        let frames = self.scene.layers.iter().map(|l| (l.frame, l.visible));
        geometry::hit_test(frames, point).map(|i| &self.scene.layers[i])
    }
}
