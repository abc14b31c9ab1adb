// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Lower-third rendering rules.
//!
//! [`render`] is a pure function from a template, caption data and animation
//! phase to a [`LowerThirdDescriptor`] that a drawing backend can paint
//! without knowing anything about templates. Ranges are clamped here, at the
//! render boundary, never in the model.

use super::ticker::TickerDescriptor;
use crate::models::lower_third::{
    AnimationKind, BackgroundMode, Borders, HorizontalAnchor, LowerThirdData,
    LowerThirdTemplate, Shadow, Typography, Variant, VerticalAnchor,
};
use crate::util::ease::Ease;
use serde::Serialize;

/// Where a lower third is in its show/hide cycle. Elapsed times are seconds
/// since the start of that phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum AnimationPhase {
    Hidden,
    Entering { elapsed: f64 },
    Shown { elapsed: f64 },
    Exiting { elapsed: f64 },
}

fn enter_duration(template: &LowerThirdTemplate) -> f64 {
    template.animation.enter_duration.clamp(0.1, 3.0)
}

fn exit_duration(template: &LowerThirdTemplate) -> f64 {
    template.animation.exit_duration.clamp(0.1, 3.0)
}

/// True when the caption scrolls as a ticker instead of sitting in the box.
pub fn ticker_active(template: &LowerThirdTemplate, data: &LowerThirdData) -> bool {
    template.ticker.is_some() && data.is_free_text()
}

/// Seconds the caption stays fully shown before hiding itself, if ever.
///
/// A running ticker uses its own timer instead of the template's.
pub fn auto_hide_after(template: &LowerThirdTemplate, data: &LowerThirdData) -> Option<f64> {
    let seconds = match (&template.ticker, ticker_active(template, data)) {
        (Some(ticker), true) => ticker.auto_hide_seconds,
        _ => template.auto_hide_seconds,
    };
    (seconds > 0.0).then(|| seconds.min(60.0))
}

/// Derive the phase `elapsed` seconds after the caption was shown.
///
/// `hide_requested_at` is when the operator asked to hide it, on the same
/// clock. The auto-hide countdown starts once the entrance has finished.
pub fn phase_at(
    template: &LowerThirdTemplate,
    data: &LowerThirdData,
    elapsed: f64,
    hide_requested_at: Option<f64>,
) -> AnimationPhase {
    if elapsed < 0.0 {
        return AnimationPhase::Hidden;
    }
    let enter = enter_duration(template);
    let auto_hide_at = auto_hide_after(template, data).map(|s| enter + s);
    let hide_at = match (hide_requested_at, auto_hide_at) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };

    if let Some(hide_at) = hide_at {
        if elapsed >= hide_at {
            let exit_elapsed = elapsed - hide_at;
            return if exit_elapsed < exit_duration(template) {
                AnimationPhase::Exiting {
                    elapsed: exit_elapsed,
                }
            } else {
                AnimationPhase::Hidden
            };
        }
    }

    if elapsed < enter {
        AnimationPhase::Entering { elapsed }
    } else {
        AnimationPhase::Shown {
            elapsed: elapsed - enter,
        }
    }
}

/// Box placement: which corner/edge it hugs and the signed pixel offset from
/// that anchor point (positive moves right/down).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub vertical: VerticalAnchor,
    pub horizontal: HorizontalAnchor,
    /// Anchor point as a fraction of the output (0, 0.5 or 1 per axis).
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub width_pct: f64,
    pub padding: f64,
    pub border_radius: f64,
}

fn resolve_placement(template: &LowerThirdTemplate) -> Placement {
    let layout = &template.layout;
    let (anchor_x, offset_x) = match layout.horizontal {
        HorizontalAnchor::Left => (0.0, layout.offset_x),
        HorizontalAnchor::Center => (0.5, layout.offset_x),
        HorizontalAnchor::Right => (1.0, -layout.offset_x),
    };
    let (anchor_y, offset_y) = match layout.vertical {
        VerticalAnchor::Top => (0.0, layout.offset_y),
        VerticalAnchor::Middle => (0.5, layout.offset_y),
        VerticalAnchor::Bottom => (1.0, -layout.offset_y),
    };
    Placement {
        vertical: layout.vertical,
        horizontal: layout.horizontal,
        anchor_x,
        anchor_y,
        offset_x,
        offset_y,
        width_pct: layout.width_pct.clamp(0.0, 100.0),
        padding: layout.padding.max(0.0),
        border_radius: layout.border_radius.max(0.0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Fill {
    Solid { color: String },
    Gradient { from: String, to: String, angle: f64 },
    Image { path: String },
    Transparent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedBackground {
    pub fill: Fill,
    /// 0.0 to 1.0.
    pub opacity: f64,
    pub blur: Option<f64>,
}

fn resolve_background(template: &LowerThirdTemplate) -> ResolvedBackground {
    let bg = &template.background;
    let fill = match bg.mode {
        BackgroundMode::Solid => Fill::Solid {
            color: bg.color.clone(),
        },
        BackgroundMode::Gradient => Fill::Gradient {
            from: bg.color.clone(),
            to: bg.gradient_to.clone(),
            angle: bg.gradient_angle,
        },
        BackgroundMode::Image => match &bg.image_path {
            Some(path) => Fill::Image { path: path.clone() },
            None => Fill::Transparent,
        },
        BackgroundMode::Transparent => Fill::Transparent,
    };
    ResolvedBackground {
        fill,
        opacity: (bg.opacity / 100.0).clamp(0.0, 1.0),
        blur: bg.blur.map(|b| b.clamp(0.0, 40.0)).filter(|b| *b > 0.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextZone {
    Primary,
    Secondary,
}

/// One line of text with its zone's typography applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLine {
    pub zone: TextZone,
    pub text: String,
    pub font_family: String,
    pub size: f64,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
}

fn styled(zone: TextZone, text: &str, typography: &Typography) -> TextLine {
    TextLine {
        zone,
        text: if typography.uppercase {
            text.to_uppercase()
        } else {
            text.to_string()
        },
        font_family: typography.font_family.clone(),
        size: typography.size.max(0.0),
        color: typography.color.clone(),
        bold: typography.bold,
        italic: typography.italic,
    }
}

fn resolve_lines(template: &LowerThirdTemplate, data: &LowerThirdData) -> Vec<TextLine> {
    let max_lines = template.max_lines.max(1) as usize;
    let primary = |text: &str| styled(TextZone::Primary, text, &template.primary);
    let secondary = |text: &str| styled(TextZone::Secondary, text, &template.secondary);

    match data {
        LowerThirdData::Nameplate { name, title } => {
            let mut lines = vec![primary(name.as_str())];
            lines.extend(title.as_deref().filter(|t| !t.is_empty()).map(secondary));
            lines
        }
        LowerThirdData::FreeText { .. } if ticker_active(template, data) => Vec::new(),
        LowerThirdData::FreeText { text } => text.lines().take(max_lines).map(primary).collect(),
        LowerThirdData::Lyrics {
            line1,
            line2,
            section_label,
        } => {
            let mut lines: Vec<TextLine> = section_label
                .as_deref()
                .filter(|l| !l.is_empty())
                .map(secondary)
                .into_iter()
                .collect();
            lines.extend(
                std::iter::once(line1.as_str())
                    .chain(line2.as_deref())
                    .take(max_lines)
                    .map(primary),
            );
            lines
        }
    }
}

/// Base layout skin of the box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "skin", rename_all = "camelCase")]
pub enum Skin {
    Classic,
    Modern,
    Banner { badge: String },
}

/// Transition state for the current frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Motion {
    pub kind: AnimationKind,
    /// Eased visibility, 0 hidden to 1 fully in.
    pub progress: f64,
    pub opacity: f64,
    /// Offset in percent of the box's own size.
    pub translate_x_pct: f64,
    pub translate_y_pct: f64,
    pub scale: f64,
    /// Horizontal reveal fraction for wipes.
    pub reveal: f64,
}

fn resolve_motion(template: &LowerThirdTemplate, phase: AnimationPhase) -> Motion {
    let progress = match phase {
        AnimationPhase::Hidden => 0.0,
        AnimationPhase::Entering { elapsed } => {
            Ease::OutCubic.apply(elapsed / enter_duration(template))
        }
        AnimationPhase::Shown { .. } => 1.0,
        AnimationPhase::Exiting { elapsed } => {
            1.0 - Ease::InCubic.apply(elapsed / exit_duration(template))
        }
    };
    let hidden = 1.0 - progress;
    let kind = template.animation.kind;
    let mut motion = Motion {
        kind,
        progress,
        opacity: if progress > 0.0 { 1.0 } else { 0.0 },
        translate_x_pct: 0.0,
        translate_y_pct: 0.0,
        scale: 1.0,
        reveal: 1.0,
    };
    match kind {
        AnimationKind::Fade => motion.opacity = progress,
        AnimationKind::SlideUp => motion.translate_y_pct = hidden * 100.0,
        AnimationKind::SlideLeft => motion.translate_x_pct = hidden * 100.0,
        AnimationKind::SlideRight => motion.translate_x_pct = -hidden * 100.0,
        AnimationKind::Wipe => motion.reveal = progress,
        AnimationKind::Scale => {
            motion.opacity = progress;
            motion.scale = 0.8 + 0.2 * progress;
        }
    }
    motion
}

/// Everything a renderer needs to draw one lower third.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowerThirdDescriptor {
    pub skin: Skin,
    pub placement: Placement,
    pub background: ResolvedBackground,
    pub borders: Borders,
    pub lines: Vec<TextLine>,
    pub text_shadow: Option<Shadow>,
    /// Outline width (0.1 to 5.0) and colour.
    pub stroke: Option<(f64, String)>,
    pub motion: Motion,
    pub auto_hide_after: Option<f64>,
    pub ticker: Option<TickerDescriptor>,
}

impl LowerThirdDescriptor {
    pub fn is_visible(&self) -> bool {
        self.motion.progress > 0.0
    }
}

/// Resolve a template and caption into a render descriptor.
pub fn render(
    template: &LowerThirdTemplate,
    data: &LowerThirdData,
    phase: AnimationPhase,
) -> LowerThirdDescriptor {
    let skin = match &template.variant {
        Variant::Classic => Skin::Classic,
        Variant::Modern => Skin::Modern,
        Variant::Banner { badge_text } => Skin::Banner {
            badge: badge_text.clone(),
        },
    };
    let ticker = match (&template.ticker, data) {
        (Some(ticker), LowerThirdData::FreeText { text }) => {
            Some(TickerDescriptor::new(ticker, text))
        }
        _ => None,
    };

    LowerThirdDescriptor {
        skin,
        placement: resolve_placement(template),
        background: resolve_background(template),
        borders: template.borders.clone(),
        lines: resolve_lines(template, data),
        text_shadow: template.text_shadow.clone(),
        stroke: template
            .stroke
            .as_ref()
            .map(|s| (s.width.clamp(0.1, 5.0), s.color.clone())),
        motion: resolve_motion(template, phase),
        auto_hide_after: auto_hide_after(template, data),
        ticker,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lower_third::{TextStroke, Ticker};

    fn shown() -> AnimationPhase {
        AnimationPhase::Shown { elapsed: 0.0 }
    }

    #[test]
    fn test_nameplate_zones_resolve_independently() {
        let mut template = LowerThirdTemplate::default();
        template.primary.uppercase = true;
        template.primary.italic = true;
        template.secondary.bold = true;

        let data = LowerThirdData::nameplate("Jane Doe", Some("Worship Leader"));
        let out = render(&template, &data, shown());

        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.lines[0].text, "JANE DOE");
        assert!(out.lines[0].bold && out.lines[0].italic);
        assert_eq!(out.lines[1].zone, TextZone::Secondary);
        assert_eq!(out.lines[1].text, "Worship Leader");
        assert!(out.lines[1].bold && !out.lines[1].italic);
    }

    #[test]
    fn test_free_text_respects_max_lines() {
        let template = LowerThirdTemplate {
            max_lines: 2,
            ..LowerThirdTemplate::default()
        };
        let data = LowerThirdData::free_text("one\ntwo\nthree");
        let out = render(&template, &data, shown());
        let texts: Vec<_> = out.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
        assert!(out.ticker.is_none());
    }

    #[test]
    fn test_lyrics_label_goes_to_secondary() {
        let template = LowerThirdTemplate::default();
        let data = LowerThirdData::Lyrics {
            line1: "Line one".to_string(),
            line2: Some("Line two".to_string()),
            section_label: Some("Chorus".to_string()),
        };
        let out = render(&template, &data, shown());
        assert_eq!(out.lines[0].zone, TextZone::Secondary);
        assert_eq!(out.lines[0].text, "Chorus");
        assert_eq!(out.lines.len(), 3);
    }

    #[test]
    fn test_background_opacity_and_blur_apply_in_every_mode() {
        let mut template = LowerThirdTemplate::default();
        template.background.opacity = 50.0;
        template.background.blur = Some(12.0);
        for mode in [
            BackgroundMode::Solid,
            BackgroundMode::Gradient,
            BackgroundMode::Transparent,
        ] {
            template.background.mode = mode;
            let out = render(&template, &LowerThirdData::free_text("x"), shown());
            assert_eq!(out.background.opacity, 0.5);
            assert_eq!(out.background.blur, Some(12.0));
        }
        template.background.mode = BackgroundMode::Gradient;
        let out = render(&template, &LowerThirdData::free_text("x"), shown());
        assert!(matches!(out.background.fill, Fill::Gradient { .. }));
    }

    #[test]
    fn test_placement_anchors() {
        let mut template = LowerThirdTemplate::default();
        template.layout.horizontal = HorizontalAnchor::Right;
        template.layout.vertical = VerticalAnchor::Top;
        template.layout.offset_x = 40.0;
        template.layout.offset_y = 20.0;
        let placement = render(&template, &LowerThirdData::free_text("x"), shown()).placement;
        assert_eq!((placement.anchor_x, placement.anchor_y), (1.0, 0.0));
        assert_eq!((placement.offset_x, placement.offset_y), (-40.0, 20.0));
    }

    #[test]
    fn test_stroke_clamped_at_render() {
        let mut template = LowerThirdTemplate::default();
        template.stroke = Some(TextStroke {
            width: 9.0,
            color: "#000".to_string(),
        });
        let out = render(&template, &LowerThirdData::free_text("x"), shown());
        assert_eq!(out.stroke, Some((5.0, "#000".to_string())));
    }

    #[test]
    fn test_ticker_only_for_free_text() {
        let mut template = LowerThirdTemplate::default();
        template.ticker = Some(Ticker {
            speed: 10,
            auto_hide_seconds: 30.0,
            ..Ticker::default()
        });
        template.auto_hide_seconds = 5.0;

        let free = LowerThirdData::free_text("Headline");
        let out = render(&template, &free, shown());
        assert!(out.lines.is_empty());
        assert_eq!(out.ticker.as_ref().unwrap().duration_secs, 4.0);
        assert_eq!(out.auto_hide_after, Some(30.0));

        let nameplate = LowerThirdData::nameplate("Jane", None);
        let out = render(&template, &nameplate, shown());
        assert!(out.ticker.is_none());
        assert_eq!(out.auto_hide_after, Some(5.0));
    }

    #[test]
    fn test_phase_timeline_with_auto_hide() {
        let mut template = LowerThirdTemplate::default();
        template.animation.enter_duration = 0.5;
        template.animation.exit_duration = 0.5;
        template.auto_hide_seconds = 2.0;
        let data = LowerThirdData::free_text("x");

        assert_eq!(phase_at(&template, &data, -1.0, None), AnimationPhase::Hidden);
        assert_eq!(
            phase_at(&template, &data, 0.25, None),
            AnimationPhase::Entering { elapsed: 0.25 }
        );
        assert_eq!(
            phase_at(&template, &data, 1.5, None),
            AnimationPhase::Shown { elapsed: 1.0 }
        );
        assert_eq!(
            phase_at(&template, &data, 2.75, None),
            AnimationPhase::Exiting { elapsed: 0.25 }
        );
        assert_eq!(phase_at(&template, &data, 3.5, None), AnimationPhase::Hidden);

        // manual hide before the timer
        match phase_at(&template, &data, 1.25, Some(1.0)) {
            AnimationPhase::Exiting { elapsed } => assert!((elapsed - 0.25).abs() < 1e-9),
            other => panic!("expected exit, got {:?}", other),
        }
    }

    #[test]
    fn test_motion_kinds() {
        let mut template = LowerThirdTemplate::default();
        template.animation.enter_duration = 1.0;
        let data = LowerThirdData::free_text("x");

        template.animation.kind = AnimationKind::SlideUp;
        let start = render(&template, &data, AnimationPhase::Entering { elapsed: 0.0 });
        assert_eq!(start.motion.translate_y_pct, 100.0);
        assert!(!start.is_visible());
        let done = render(&template, &data, shown());
        assert_eq!(done.motion.translate_y_pct, 0.0);
        assert_eq!(done.motion.opacity, 1.0);

        template.animation.kind = AnimationKind::Fade;
        let half = render(&template, &data, AnimationPhase::Exiting { elapsed: 0.2 });
        assert!(half.motion.opacity > 0.0 && half.motion.opacity < 1.0);

        template.animation.kind = AnimationKind::Scale;
        let hidden = render(&template, &data, AnimationPhase::Hidden);
        assert_eq!(hidden.motion.scale, 0.8);
        assert_eq!(hidden.motion.opacity, 0.0);
    }

    #[test]
    fn test_banner_skin_carries_badge() {
        let template = LowerThirdTemplate {
            variant: Variant::Banner {
                badge_text: "LIVE".to_string(),
            },
            ..LowerThirdTemplate::default()
        };
        let out = render(&template, &LowerThirdData::free_text("x"), shown());
        assert_eq!(
            out.skin,
            Skin::Banner {
                badge: "LIVE".to_string()
            }
        );
    }
}
