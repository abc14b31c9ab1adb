// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Content variants for scene layers and slide elements.
//!
//! Every consumer matches these enums exhaustively, so adding a variant is a
//! compile error everywhere it needs handling.

use super::lower_third::{LowerThirdData, LowerThirdTemplate};
use serde::{Deserialize, Serialize};

/// Live source a layer points at. Only the reference is stored; pixels are
/// looked up by the renderer on every composite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceRef {
    /// Program output of the main display.
    LiveOutput,
    /// Whatever lower third is currently on air.
    LowerThirdLive,
    #[serde(rename_all = "camelCase")]
    LocalCamera { device_id: String },
    #[serde(rename_all = "camelCase")]
    LanCamera { device_id: String },
}

/// What a scene layer shows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayerContent {
    #[default]
    Empty,
    StaticColor {
        color: String,
    },
    StaticImage {
        path: String,
    },
    Source {
        source: SourceRef,
    },
    /// Frozen copy of a caption and its template.
    LowerThird {
        data: LowerThirdData,
        template: Box<LowerThirdTemplate>,
    },
    /// Frozen copy of an external display item (verse, media, slide).
    Item {
        item: serde_json::Value,
    },
}

/// Short label used by layer lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentBadge {
    Empty,
    Color,
    Image,
    Output,
    LiveLowerThird,
    Camera,
    LanCamera,
    LowerThird,
    Item,
}

impl ContentBadge {
    pub fn label(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Color => "Color",
            Self::Image => "Image",
            Self::Output => "Live output",
            Self::LiveLowerThird => "Live LT",
            Self::Camera => "Camera",
            Self::LanCamera => "LAN camera",
            Self::LowerThird => "Lower third",
            Self::Item => "Item",
        }
    }
}

impl LayerContent {
    pub fn lower_third(data: LowerThirdData, template: LowerThirdTemplate) -> Self {
        Self::LowerThird {
            data,
            template: Box::new(template),
        }
    }

    pub fn badge(&self) -> ContentBadge {
        match self {
            Self::Empty => ContentBadge::Empty,
            Self::StaticColor { .. } => ContentBadge::Color,
            Self::StaticImage { .. } => ContentBadge::Image,
            Self::Source { source } => match source {
                SourceRef::LiveOutput => ContentBadge::Output,
                SourceRef::LowerThirdLive => ContentBadge::LiveLowerThird,
                SourceRef::LocalCamera { .. } => ContentBadge::Camera,
                SourceRef::LanCamera { .. } => ContentBadge::LanCamera,
            },
            Self::LowerThird { .. } => ContentBadge::LowerThird,
            Self::Item { .. } => ContentBadge::Item,
        }
    }

    /// Live sources change outside the scene and must be re-resolved per frame.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Source { .. })
    }

    /// Name suggested for a layer created with this content.
    pub fn default_name(&self) -> String {
        match self {
            Self::LowerThird { data, .. } => match data {
                LowerThirdData::Nameplate { name, .. } => name.clone(),
                LowerThirdData::FreeText { .. } => "Caption".to_string(),
                LowerThirdData::Lyrics { .. } => "Lyrics".to_string(),
            },
            Self::Item { item } => item
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("Item")
                .to_string(),
            other => other.badge().label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
    Line,
}

/// Kind tag of a slide element, used when creating one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Shape,
}

/// Kind-specific content and style of a slide element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementContent {
    #[serde(rename_all = "camelCase")]
    Text {
        text: String,
        font_family: String,
        font_size: f64,
        color: String,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        italic: bool,
        #[serde(default)]
        align: TextAlign,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        path: String,
        #[serde(default)]
        fit: ImageFit,
    },
    #[serde(rename_all = "camelCase")]
    Shape {
        shape: ShapeKind,
        fill: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        #[serde(default)]
        stroke_width: f64,
    },
}

impl ElementContent {
    /// Fresh content for a newly inserted element.
    pub fn placeholder(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Text => Self::Text {
                text: "Text".to_string(),
                font_family: "Inter".to_string(),
                font_size: 48.0,
                color: "#ffffff".to_string(),
                bold: false,
                italic: false,
                align: TextAlign::Center,
            },
            ElementKind::Image => Self::Image {
                path: String::new(),
                fit: ImageFit::Contain,
            },
            ElementKind::Shape => Self::Shape {
                shape: ShapeKind::Rectangle,
                fill: "#3b82f6".to_string(),
                stroke: None,
                stroke_width: 0.0,
            },
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text { .. } => ElementKind::Text,
            Self::Image { .. } => ElementKind::Image,
            Self::Shape { .. } => ElementKind::Shape,
        }
    }
}
