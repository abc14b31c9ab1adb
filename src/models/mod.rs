// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for scenes, slides, lower thirds and props.

pub mod content;
pub mod lower_third;
pub mod presentation;
pub mod props;
pub mod scene;

/// First `{prefix}-{n}` id (n counting from 1) for which `taken` is false.
pub(crate) fn unique_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    (1u64..)
        .map(|n| format!("{}-{}", prefix, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| prefix.to_string())
}
