// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay Studio
//!
//! Scene, slide and lower-third composition for live broadcast overlays.
//! Produces render descriptors; drawing pixels is left to the host.

pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod io;
pub mod models;
pub mod render;
pub mod ui;
pub mod util;

pub use app::Studio;
pub use config::StudioConfig;
pub use error::{StudioError, StudioResult};
