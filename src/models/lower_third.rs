// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Lower-third templates and caption data.
//!
//! A [`LowerThirdTemplate`] is a reusable style record; [`LowerThirdData`] is
//! the text shown through it. Both are plain values so a layer can freeze a
//! copy of them at assignment time.

use crate::error::{StudioError, StudioResult};
use serde::{Deserialize, Serialize};

/// Caption content shown through a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LowerThirdData {
    Nameplate {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    FreeText {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Lyrics {
        line1: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line2: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        section_label: Option<String>,
    },
}

impl LowerThirdData {
    pub fn nameplate(name: impl Into<String>, title: Option<&str>) -> Self {
        Self::Nameplate {
            name: name.into(),
            title: title.map(str::to_string),
        }
    }

    pub fn free_text(text: impl Into<String>) -> Self {
        Self::FreeText { text: text.into() }
    }

    pub fn is_free_text(&self) -> bool {
        matches!(self, Self::FreeText { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    Top,
    Middle,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAnchor {
    #[default]
    Left,
    Center,
    Right,
}

/// Box placement on the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Layout {
    pub vertical: VerticalAnchor,
    pub horizontal: HorizontalAnchor,
    /// Box width in percent of the output width.
    pub width_pct: f64,
    pub border_radius: f64,
    /// Pixel offset away from the anchored edge.
    pub offset_x: f64,
    pub offset_y: f64,
    pub padding: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            vertical: VerticalAnchor::Bottom,
            horizontal: HorizontalAnchor::Left,
            width_pct: 40.0,
            border_radius: 8.0,
            offset_x: 48.0,
            offset_y: 48.0,
            padding: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    #[default]
    Solid,
    Gradient,
    Image,
    Transparent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Background {
    pub mode: BackgroundMode,
    pub color: String,
    /// Second stop for gradient mode.
    pub gradient_to: String,
    pub gradient_angle: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// 0 to 100.
    pub opacity: f64,
    /// Backdrop blur radius, 0 to 40.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            mode: BackgroundMode::Solid,
            color: "#111827".to_string(),
            gradient_to: "#1f2937".to_string(),
            gradient_angle: 90.0,
            image_path: None,
            opacity: 90.0,
            blur: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccentBar {
    pub side: Side,
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outline {
    pub color: String,
    pub width: f64,
}

/// Drop shadow used for both the box and the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: String,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Borders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<AccentBar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<Shadow>,
}

/// Font settings for one text zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    pub size: f64,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub uppercase: bool,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            size: 32.0,
            color: "#ffffff".to_string(),
            bold: false,
            italic: false,
            uppercase: false,
        }
    }
}

impl Typography {
    fn secondary() -> Self {
        Self {
            size: 22.0,
            color: "#d1d5db".to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStroke {
    /// 0.1 to 5.0.
    pub width: f64,
    pub color: String,
}

/// Base layout skin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "camelCase")]
pub enum Variant {
    #[default]
    Classic,
    Modern,
    #[serde(rename_all = "camelCase")]
    Banner { badge_text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    #[default]
    Fade,
    SlideUp,
    SlideLeft,
    SlideRight,
    Wipe,
    Scale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Animation {
    pub kind: AnimationKind,
    /// Seconds, 0.1 to 3.0.
    pub enter_duration: f64,
    /// Seconds, 0.1 to 3.0.
    pub exit_duration: f64,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            kind: AnimationKind::Fade,
            enter_duration: 0.5,
            exit_duration: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickerDirection {
    #[default]
    Rtl,
    Ltr,
}

/// Scrolling ticker settings, honoured for free-text captions only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ticker {
    pub direction: TickerDirection,
    /// 1 (slowest) to 10 (fastest).
    pub speed: u8,
    pub separator: String,
    pub gap_px: f64,
    /// Number of repetitions; 0 scrolls indefinitely.
    pub repeat: u32,
    /// Auto-hide timer used instead of the template's while the ticker runs.
    pub auto_hide_seconds: f64,
}

impl Default for Ticker {
    fn default() -> Self {
        Self {
            direction: TickerDirection::Rtl,
            speed: 5,
            separator: "•".to_string(),
            gap_px: 48.0,
            repeat: 0,
            auto_hide_seconds: 0.0,
        }
    }
}

/// Reusable style configuration for lower thirds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LowerThirdTemplate {
    pub id: String,
    pub name: String,
    pub layout: Layout,
    pub background: Background,
    pub borders: Borders,
    pub primary: Typography,
    pub secondary: Typography,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_shadow: Option<Shadow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<TextStroke>,
    pub max_lines: u32,
    pub variant: Variant,
    pub animation: Animation,
    /// 0 disables auto-hide; up to 60.
    pub auto_hide_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<Ticker>,
}

impl Default for LowerThirdTemplate {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            name: "Default".to_string(),
            layout: Layout::default(),
            background: Background::default(),
            borders: Borders::default(),
            primary: Typography {
                bold: true,
                ..Typography::default()
            },
            secondary: Typography::secondary(),
            text_shadow: None,
            stroke: None,
            max_lines: 2,
            variant: Variant::Classic,
            animation: Animation::default(),
            auto_hide_seconds: 0.0,
            ticker: None,
        }
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> StudioResult<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(StudioError::validation(format!(
            "{} must be within {}..={}, got {}",
            field, min, max, value
        )))
    }
}

impl LowerThirdTemplate {
    /// Check every bounded field. Used to reject malformed imports; the model
    /// itself never clamps.
    pub fn validate(&self) -> StudioResult<()> {
        if self.id.trim().is_empty() {
            return Err(StudioError::validation("template id must be non-empty"));
        }
        check_range("background.opacity", self.background.opacity, 0.0, 100.0)?;
        if let Some(blur) = self.background.blur {
            check_range("background.blur", blur, 0.0, 40.0)?;
        }
        if self.background.mode == BackgroundMode::Image && self.background.image_path.is_none() {
            return Err(StudioError::validation(
                "background.imagePath is required in image mode",
            ));
        }
        if let Some(stroke) = &self.stroke {
            check_range("stroke.width", stroke.width, 0.1, 5.0)?;
        }
        check_range("layout.widthPct", self.layout.width_pct, 0.0, 100.0)?;
        check_range(
            "animation.enterDuration",
            self.animation.enter_duration,
            0.1,
            3.0,
        )?;
        check_range(
            "animation.exitDuration",
            self.animation.exit_duration,
            0.1,
            3.0,
        )?;
        check_range("autoHideSeconds", self.auto_hide_seconds, 0.0, 60.0)?;
        if self.max_lines == 0 {
            return Err(StudioError::validation("maxLines must be at least 1"));
        }
        if let Some(ticker) = &self.ticker {
            if !(1..=10).contains(&ticker.speed) {
                return Err(StudioError::validation(format!(
                    "ticker.speed must be within 1..=10, got {}",
                    ticker.speed
                )));
            }
            check_range("ticker.gapPx", ticker.gap_px, 0.0, f64::MAX)?;
            check_range("ticker.autoHideSeconds", ticker.auto_hide_seconds, 0.0, 60.0)?;
        }
        Ok(())
    }
}
