// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Inspector rows for layer and element lists.
//!
//! The rows are plain data a UI toolkit can display; building them never
//! touches the model.

use crate::models::content::{ContentBadge, ElementKind};
use crate::models::presentation::Slide;
use crate::models::scene::SceneGraph;
use crate::util::geometry::Frame;

/// One line of the layer list, topmost layer first.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRow {
    pub id: String,
    pub name: String,
    pub badge: ContentBadge,
    pub visible: bool,
    pub selected: bool,
}

/// Build the layer list, top of the stack first like most compositors show it.
pub fn layer_rows(graph: &SceneGraph) -> Vec<LayerRow> {
    graph
        .scene()
        .layers
        .iter()
        .rev()
        .map(|layer| LayerRow {
            id: layer.id.clone(),
            name: layer.name.clone(),
            badge: layer.content.badge(),
            visible: layer.visible,
            selected: graph.selected() == Some(layer.id.as_str()),
        })
        .collect()
}

/// One line of the element list.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRow {
    pub id: String,
    pub kind: ElementKind,
    pub frame: Frame,
    pub z_index: i32,
    pub locked: bool,
    pub selected: bool,
}

/// Build the element list in reverse paint order (topmost first).
pub fn element_rows(slide: &Slide, selected: Option<&str>) -> Vec<ElementRow> {
    slide
        .paint_order()
        .into_iter()
        .rev()
        .map(|element| ElementRow {
            id: element.id.clone(),
            kind: element.content.kind(),
            frame: element.frame,
            z_index: element.z_index,
            locked: element.locked,
            selected: selected == Some(element.id.as_str()),
        })
        .collect()
}
