// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer gestures on the editing canvas.
//!
//! A gesture starts on pointer-down over a layer/element (drag) or one of its
//! eight resize handles, produces uncommitted previews on every pointer move,
//! and yields a single commit on release. Only one gesture can be active per
//! canvas.

use crate::error::{StudioError, StudioResult};
use crate::util::geometry::{pixel_delta_to_percent, Frame, MIN_SIZE_PCT};
use serde::{Deserialize, Serialize};

/// Canvas size in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pointer position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

impl PointerPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Resize handle on a selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    /// North edge
    N,
    NE,
    /// East edge
    E,
    SE,
    /// South edge
    S,
    SW,
    /// West edge
    W,
    NW,
}

impl ResizeHandle {
    fn moves_west(self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }

    fn moves_east(self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    fn moves_north(self) -> bool {
        matches!(self, Self::N | Self::NE | Self::NW)
    }

    fn moves_south(self) -> bool {
        matches!(self, Self::S | Self::SE | Self::SW)
    }
}

/// Move a frame by a percentage delta.
pub fn drag_frame(initial: Frame, dx_pct: f64, dy_pct: f64) -> Frame {
    initial.translate(dx_pct, dy_pct)
}

/// Grow or shrink a frame from one handle by a percentage delta.
///
/// East/south handles change only the size. West/north handles keep the
/// opposite edge fixed: position moves by the delta and size changes by the
/// same amount in reverse. Sizes never drop below [`MIN_SIZE_PCT`], or below
/// their starting size when that is already smaller.
pub fn resize_frame(initial: Frame, handle: ResizeHandle, dx_pct: f64, dy_pct: f64) -> Frame {
    resize_frame_with_min(initial, handle, dx_pct, dy_pct, MIN_SIZE_PCT)
}

/// [`resize_frame`] with an explicit minimum size.
pub fn resize_frame_with_min(
    initial: Frame,
    handle: ResizeHandle,
    dx_pct: f64,
    dy_pct: f64,
    min_size: f64,
) -> Frame {
    let mut frame = initial;
    // a frame already under the minimum may grow but never shrinks further
    let min_w = min_size.min(initial.w);
    let min_h = min_size.min(initial.h);

    if handle.moves_east() {
        frame.w = (initial.w + dx_pct).max(min_w);
    } else if handle.moves_west() {
        let dx = dx_pct.min(initial.w - min_w);
        frame.x = initial.x + dx;
        frame.w = initial.w - dx;
    }

    if handle.moves_south() {
        frame.h = (initial.h + dy_pct).max(min_h);
    } else if handle.moves_north() {
        let dy = dy_pct.min(initial.h - min_h);
        frame.y = initial.y + dy;
        frame.h = initial.h - dy;
    }

    frame
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize(ResizeHandle),
}

#[derive(Debug, Clone)]
struct ActiveGesture {
    target: String,
    kind: GestureKind,
    origin: PointerPos,
    initial: Frame,
    last: Frame,
}

/// Result of a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    None,
    /// Live, uncommitted geometry while the pointer moves.
    Preview { target: String, frame: Frame },
    /// Final geometry on release; record it in history.
    Commit { target: String, frame: Frame },
}

/// Tracks the single in-flight gesture of one canvas.
#[derive(Debug, Clone)]
pub struct GestureController {
    canvas: CanvasSize,
    min_size: f64,
    active: Option<ActiveGesture>,
}

impl GestureController {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            min_size: MIN_SIZE_PCT,
            active: None,
        }
    }

    /// Smallest width/height a resize can produce, in percent.
    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = min_size.max(0.0);
        self
    }

    /// Pixel size of the canvas
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Update the canvas size after the view is resized
    pub fn set_canvas_size(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    /// Check if a drag or resize is in progress
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the layer/element being manipulated.
    pub fn target(&self) -> Option<&str> {
        self.active.as_ref().map(|g| g.target.as_str())
    }

    /// Start a gesture on `target`, capturing its frame at pointer-down.
    pub fn begin(
        &mut self,
        target: &str,
        kind: GestureKind,
        origin: PointerPos,
        initial: Frame,
    ) -> StudioResult<()> {
        if self.active.is_some() {
            return Err(StudioError::GestureActive);
        }
        log::debug!("Begin {:?} on {}", kind, target);
        self.active = Some(ActiveGesture {
            target: target.to_string(),
            kind,
            origin,
            initial,
            last: initial,
        });
        Ok(())
    }

    pub fn begin_drag(&mut self, target: &str, origin: PointerPos, initial: Frame) -> StudioResult<()> {
        self.begin(target, GestureKind::Drag, origin, initial)
    }

    pub fn begin_resize(
        &mut self,
        target: &str,
        handle: ResizeHandle,
        origin: PointerPos,
        initial: Frame,
    ) -> StudioResult<()> {
        self.begin(target, GestureKind::Resize(handle), origin, initial)
    }

    /// Compute the uncommitted frame for the current pointer position.
    pub fn pointer_move(&mut self, pos: PointerPos) -> CanvasAction {
        let canvas = self.canvas;
        let min_size = self.min_size;
        let Some(gesture) = self.active.as_mut() else {
            return CanvasAction::None;
        };
        let dx = pixel_delta_to_percent(pos.x - gesture.origin.x, canvas.width);
        let dy = pixel_delta_to_percent(pos.y - gesture.origin.y, canvas.height);
        gesture.last = match gesture.kind {
            GestureKind::Drag => drag_frame(gesture.initial, dx, dy),
            GestureKind::Resize(handle) => {
                resize_frame_with_min(gesture.initial, handle, dx, dy, min_size)
            }
        };
        CanvasAction::Preview {
            target: gesture.target.clone(),
            frame: gesture.last,
        }
    }

    /// End the gesture. Commits the last computed frame, or nothing if the
    /// pointer never moved the target.
    pub fn pointer_up(&mut self) -> CanvasAction {
        let Some(gesture) = self.active.take() else {
            return CanvasAction::None;
        };
        if gesture.last == gesture.initial {
            log::debug!("Gesture on {} released without change", gesture.target);
            return CanvasAction::None;
        }
        log::info!(
            "Committed {:?} on {}: ({:.2}, {:.2}, {:.2}, {:.2})",
            gesture.kind,
            gesture.target,
            gesture.last.x,
            gesture.last.y,
            gesture.last.w,
            gesture.last.h
        );
        CanvasAction::Commit {
            target: gesture.target,
            frame: gesture.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_frame_eq(actual: Frame, expected: Frame) {
        for (a, e) in [
            (actual.x, expected.x),
            (actual.y, expected.y),
            (actual.w, expected.w),
            (actual.h, expected.h),
        ] {
            assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_drag_scales_by_canvas_size() {
        let mut gestures = GestureController::new(CanvasSize::new(800.0, 450.0));
        let initial = Frame::new(10.0, 10.0, 20.0, 20.0);
        gestures
            .begin_drag("l1", PointerPos::new(100.0, 100.0), initial)
            .unwrap();

        let mut previews = 0;
        for step in 1..=5 {
            let pos = PointerPos::new(100.0 + 20.0 * step as f64, 100.0 - 9.0 * step as f64);
            if let CanvasAction::Preview { .. } = gestures.pointer_move(pos) {
                previews += 1;
            }
        }
        assert_eq!(previews, 5);

        match gestures.pointer_up() {
            CanvasAction::Commit { target, frame } => {
                assert_eq!(target, "l1");
                // dx = 100px of 800 = 12.5%, dy = -45px of 450 = -10%
                assert_frame_eq(frame, Frame::new(22.5, 0.0, 20.0, 20.0));
            }
            other => panic!("expected commit, got {:?}", other),
        }
        assert!(!gestures.is_active());
        assert_eq!(gestures.pointer_up(), CanvasAction::None);
    }

    #[test]
    fn test_west_handle_keeps_right_edge() {
        let initial = Frame::new(20.0, 0.0, 30.0, 10.0);
        let frame = resize_frame(initial, ResizeHandle::W, 10.0, 0.0);
        assert_frame_eq(frame, Frame::new(30.0, 0.0, 20.0, 10.0));

        let clamped = resize_frame(initial, ResizeHandle::W, 45.0, 0.0);
        assert_frame_eq(clamped, Frame::new(49.0, 0.0, 1.0, 10.0));
        assert_eq!(clamped.x + clamped.w, 50.0);
    }

    #[test]
    fn test_east_and_south_only_grow_size() {
        let initial = Frame::new(20.0, 30.0, 30.0, 10.0);
        assert_frame_eq(
            resize_frame(initial, ResizeHandle::SE, 5.0, -4.0),
            Frame::new(20.0, 30.0, 35.0, 6.0),
        );
        assert_frame_eq(
            resize_frame(initial, ResizeHandle::E, -50.0, 0.0),
            Frame::new(20.0, 30.0, 1.0, 10.0),
        );
    }

    #[test]
    fn test_north_west_corner() {
        let initial = Frame::new(20.0, 30.0, 30.0, 10.0);
        assert_frame_eq(
            resize_frame(initial, ResizeHandle::NW, -5.0, 20.0),
            Frame::new(15.0, 39.0, 35.0, 1.0),
        );
    }

    #[test]
    fn test_undersized_frame_is_stable() {
        let tiny = Frame::new(40.0, 40.0, 0.5, 0.25);
        for handle in [
            ResizeHandle::N,
            ResizeHandle::S,
            ResizeHandle::E,
            ResizeHandle::W,
            ResizeHandle::NW,
            ResizeHandle::NE,
            ResizeHandle::SW,
            ResizeHandle::SE,
        ] {
            assert_frame_eq(resize_frame(tiny, handle, 0.0, 0.0), tiny);
        }
        // shrinking is refused, growing still works
        assert_frame_eq(resize_frame(tiny, ResizeHandle::W, 0.2, 0.0), tiny);
        assert_frame_eq(
            resize_frame(tiny, ResizeHandle::NW, -1.0, -1.0),
            Frame::new(39.0, 39.0, 1.5, 1.25),
        );
    }

    #[test]
    fn test_configured_min_size() {
        let mut gestures =
            GestureController::new(CanvasSize::new(100.0, 100.0)).with_min_size(5.0);
        gestures
            .begin_resize(
                "a",
                ResizeHandle::E,
                PointerPos::new(50.0, 50.0),
                Frame::new(0.0, 0.0, 20.0, 20.0),
            )
            .unwrap();
        match gestures.pointer_move(PointerPos::new(0.0, 50.0)) {
            CanvasAction::Preview { frame, .. } => assert_eq!(frame.w, 5.0),
            other => panic!("expected preview, got {:?}", other),
        }
    }

    #[test]
    fn test_single_gesture_per_canvas() {
        let mut gestures = GestureController::new(CanvasSize::new(100.0, 100.0));
        gestures
            .begin_drag("a", PointerPos::new(0.0, 0.0), Frame::FULL)
            .unwrap();
        assert!(matches!(
            gestures.begin_resize("b", ResizeHandle::N, PointerPos::new(0.0, 0.0), Frame::FULL),
            Err(StudioError::GestureActive)
        ));
        assert_eq!(gestures.target(), Some("a"));
    }

    #[test]
    fn test_release_without_move_commits_nothing() {
        let mut gestures = GestureController::new(CanvasSize::new(100.0, 100.0));
        gestures
            .begin_drag("a", PointerPos::new(5.0, 5.0), Frame::FULL)
            .unwrap();
        assert_eq!(gestures.pointer_up(), CanvasAction::None);
        assert_eq!(gestures.pointer_move(PointerPos::new(9.0, 9.0)), CanvasAction::None);
    }
}
