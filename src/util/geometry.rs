// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Percentage-space geometry.
//!
//! Every positioned thing on the 16:9 canvas stores its rectangle as
//! percentages of the canvas size. This module converts pointer pixels into
//! that space and provides alignment and z-order arithmetic shared by scene
//! layers and slide elements.

use serde::{Deserialize, Serialize};

/// Smallest width/height a resize gesture may produce, in percent.
pub const MIN_SIZE_PCT: f64 = 1.0;

/// A point in percentage space (0.0 to 100.0 covers the canvas).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Position and size of a layer or element, in percent of the canvas.
///
/// Values are not range-checked; off-canvas staging is allowed. Use
/// [`Frame::clamped_for_render`] when handing a frame to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Default for Frame {
    fn default() -> Self {
        Self::FULL
    }
}

impl Frame {
    /// The whole canvas.
    pub const FULL: Frame = Frame {
        x: 0.0,
        y: 0.0,
        w: 100.0,
        h: 100.0,
    };

    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Check if a point lies inside the frame (right/bottom edges exclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.w
            && point.y >= self.y
            && point.y < self.y + self.h
    }

    /// Return a copy with the fields present in `patch` replaced.
    pub fn apply(self, patch: FramePatch) -> Self {
        Self {
            x: patch.x.unwrap_or(self.x),
            y: patch.y.unwrap_or(self.y),
            w: patch.w.unwrap_or(self.w),
            h: patch.h.unwrap_or(self.h),
        }
    }

    /// Shift the frame by a percentage offset.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Clamp the frame into values a renderer can always draw.
    ///
    /// Size is limited to `[0, 100]`. Position may still be off-canvas but
    /// never further than one full frame beyond the left/top edge or past the
    /// right/bottom edge. Non-finite inputs collapse to zero.
    pub fn clamped_for_render(self) -> Self {
        let w = finite_or_zero(self.w).clamp(0.0, 100.0);
        let h = finite_or_zero(self.h).clamp(0.0, 100.0);
        Self {
            x: finite_or_zero(self.x).clamp(-w, 100.0),
            y: finite_or_zero(self.y).clamp(-h, 100.0),
            w,
            h,
        }
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Partial geometry update; `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FramePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
}

impl FramePatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size(w: f64, h: f64) -> Self {
        Self {
            w: Some(w),
            h: Some(h),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.w.is_none() && self.h.is_none()
    }
}

impl From<Frame> for FramePatch {
    fn from(frame: Frame) -> Self {
        Self {
            x: Some(frame.x),
            y: Some(frame.y),
            w: Some(frame.w),
            h: Some(frame.h),
        }
    }
}

/// Convert pixel coordinates on a canvas into percentage coordinates.
pub fn normalize_coordinates(pixel_x: f64, pixel_y: f64, width: u32, height: u32) -> Point {
    Point {
        x: pixel_delta_to_percent(pixel_x, width as f64),
        y: pixel_delta_to_percent(pixel_y, height as f64),
    }
}

/// Convert percentage coordinates back to pixels.
pub fn denormalize_coordinates(point: &Point, width: u32, height: u32) -> (f64, f64) {
    (
        point.x / 100.0 * width as f64,
        point.y / 100.0 * height as f64,
    )
}

/// Scale a pixel distance into percent of a canvas dimension.
///
/// A degenerate canvas (zero or negative size) maps every delta to zero.
pub fn pixel_delta_to_percent(delta_px: f64, canvas_px: f64) -> f64 {
    if canvas_px <= 0.0 {
        return 0.0;
    }
    delta_px / canvas_px * 100.0
}

/// Snap target for the alignment helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Snap a frame against the canvas edges.
///
/// Assumes the frame fits the canvas. A frame wider than 100 aligned right or
/// center ends up with a negative position; that result is passed through.
pub fn align(frame: Frame, alignment: Alignment) -> Frame {
    match alignment {
        Alignment::Left => Frame { x: 0.0, ..frame },
        Alignment::Right => Frame {
            x: 100.0 - frame.w,
            ..frame
        },
        Alignment::Center => Frame {
            x: (100.0 - frame.w) / 2.0,
            ..frame
        },
        Alignment::Top => Frame { y: 0.0, ..frame },
        Alignment::Bottom => Frame {
            y: 100.0 - frame.h,
            ..frame
        },
        Alignment::Middle => Frame {
            y: (100.0 - frame.h) / 2.0,
            ..frame
        },
    }
}

/// Anything painted in `z_index` order among siblings.
pub trait Stacked {
    fn id(&self) -> &str;
    fn z_index(&self) -> i32;
    fn set_z_index(&mut self, z_index: i32);
}

/// Z-order command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZMove {
    Forward,
    Backward,
    Front,
    Back,
}

/// Index of the topmost frame containing `point`.
///
/// `frames` is in paint order (bottom first); hidden entries are skipped.
pub fn hit_test<I>(frames: I, point: Point) -> Option<usize>
where
    I: IntoIterator<Item = (Frame, bool)>,
{
    frames
        .into_iter()
        .enumerate()
        .filter(|(_, (frame, visible))| *visible && frame.contains(point))
        .map(|(i, _)| i)
        .last()
}

/// Indices of `items` in paint order: ascending `z_index`, ties by array order.
pub fn paint_order<T: Stacked>(items: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    // sort_by_key is stable, which keeps array order for equal z values
    order.sort_by_key(|&i| items[i].z_index());
    order
}

/// The `z_index` that puts a new item on top of `items`.
pub fn next_z_index<T: Stacked>(items: &[T]) -> i32 {
    items
        .iter()
        .map(Stacked::z_index)
        .max()
        .map_or(0, |max| max + 1)
}

/// Apply a z-order move to the item with `id`.
///
/// Forward/backward swap `z_index` with the neighbour in paint order; front and
/// back go one past the current extreme. Duplicate values are never
/// renumbered. Returns `false` when the id is unknown or the move has no
/// neighbour to swap with.
pub fn restack<T: Stacked>(items: &mut [T], id: &str, movement: ZMove) -> bool {
    let order = paint_order(items);
    let Some(pos) = order.iter().position(|&i| items[i].id() == id) else {
        return false;
    };
    let target = order[pos];

    match movement {
        ZMove::Forward | ZMove::Backward => {
            let neighbour = match movement {
                ZMove::Forward => order.get(pos + 1).copied(),
                _ => pos.checked_sub(1).map(|p| order[p]),
            };
            let Some(neighbour) = neighbour else {
                return false;
            };
            let a = items[target].z_index();
            let b = items[neighbour].z_index();
            items[target].set_z_index(b);
            items[neighbour].set_z_index(a);
        }
        ZMove::Front => {
            let max = items.iter().map(Stacked::z_index).max().unwrap_or(0);
            items[target].set_z_index(max + 1);
        }
        ZMove::Back => {
            let min = items.iter().map(Stacked::z_index).min().unwrap_or(0);
            items[target].set_z_index(min - 1);
        }
    }
    true
}
