// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Render descriptors consumed by an external compositor.

pub mod lower_third;
pub mod scene;
pub mod ticker;
