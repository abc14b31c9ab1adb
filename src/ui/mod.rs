// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor interaction: canvas gestures, inspector rows and shortcuts.

pub mod canvas;
pub mod properties;
pub mod shortcuts;
