// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scrolling ticker timing.

use crate::models::lower_third::{Ticker, TickerDirection};
use serde::Serialize;

/// Seconds for one pass across the output. Speed is clamped to `1..=10`.
pub fn scroll_duration_secs(speed: u8) -> f64 {
    let speed = speed.clamp(1, 10);
    f64::from(11 - speed) * 4.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "count", rename_all = "lowercase")]
pub enum TickerRepeat {
    Infinite,
    Count(u32),
}

/// Render-ready ticker strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerDescriptor {
    pub direction: TickerDirection,
    pub duration_secs: f64,
    pub text: String,
    pub separator: String,
    pub gap_px: f64,
    pub repeat: TickerRepeat,
}

impl TickerDescriptor {
    pub fn new(ticker: &Ticker, text: &str) -> Self {
        Self {
            direction: ticker.direction,
            duration_secs: scroll_duration_secs(ticker.speed),
            text: text.to_string(),
            separator: ticker.separator.clone(),
            gap_px: ticker.gap_px.max(0.0),
            repeat: match ticker.repeat {
                0 => TickerRepeat::Infinite,
                n => TickerRepeat::Count(n),
            },
        }
    }

    /// The strip for a fixed repeat count as text and separator runs, in
    /// order. The renderer leaves `gap_px` between neighbouring runs. `None`
    /// when it loops forever and the renderer tiles the text itself.
    pub fn segments(&self) -> Option<Vec<&str>> {
        match self.repeat {
            TickerRepeat::Infinite => None,
            TickerRepeat::Count(n) => {
                let mut runs = Vec::with_capacity((n as usize * 2).saturating_sub(1));
                for i in 0..n {
                    if i > 0 && !self.separator.is_empty() {
                        runs.push(self.separator.as_str());
                    }
                    runs.push(self.text.as_str());
                }
                Some(runs)
            }
        }
    }

    /// Fraction of the current pass completed at `elapsed` seconds.
    ///
    /// A fixed-count strip scrolls once and then reports `None`.
    pub fn scroll_progress(&self, elapsed: f64) -> Option<f64> {
        if elapsed < 0.0 || self.duration_secs <= 0.0 {
            return Some(0.0);
        }
        match self.repeat {
            TickerRepeat::Infinite => Some((elapsed % self.duration_secs) / self.duration_secs),
            TickerRepeat::Count(_) if elapsed < self.duration_secs => {
                Some(elapsed / self.duration_secs)
            }
            TickerRepeat::Count(_) => None,
        }
    }

    /// Left edge of the strip in pixels for a given pass progress.
    pub fn strip_offset_px(&self, progress: f64, strip_width: f64, viewport_width: f64) -> f64 {
        let travel = viewport_width + strip_width;
        match self.direction {
            TickerDirection::Rtl => viewport_width - progress * travel,
            TickerDirection::Ltr => -strip_width + progress * travel,
        }
    }
}
