// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Props: persistent graphics (logos, clocks, bugs) that stay on air across
//! slide changes.

use crate::error::{StudioError, StudioResult};
use crate::util::geometry::Frame;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PropKind {
    Image {
        path: String,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        text: String,
        color: String,
        font_size: f64,
    },
    /// Wall clock; `format` is a strftime-style pattern.
    Clock {
        format: String,
        color: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropItem {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: PropKind,
    pub frame: Frame,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

/// Reject a props list with duplicate ids.
pub fn validate_props(props: &[PropItem]) -> StudioResult<()> {
    let mut seen = HashSet::new();
    for prop in props {
        if !seen.insert(prop.id.as_str()) {
            return Err(StudioError::validation(format!(
                "duplicate prop id '{}'",
                prop.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(id: &str) -> PropItem {
        PropItem {
            id: id.to_string(),
            name: "Clock".to_string(),
            kind: PropKind::Clock {
                format: "%H:%M".to_string(),
                color: "#fff".to_string(),
            },
            frame: Frame::new(85.0, 2.0, 12.0, 6.0),
            opacity: 1.0,
            visible: true,
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        assert!(validate_props(&[clock("a"), clock("b")]).is_ok());
        assert!(validate_props(&[clock("a"), clock("a")]).is_err());
    }

    #[test]
    fn test_prop_wire_format() {
        let json = serde_json::to_value(clock("a")).unwrap();
        assert_eq!(json["type"], "clock");
        assert_eq!(json["frame"]["w"], 12.0);
    }
}
