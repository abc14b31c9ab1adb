// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shared math helpers.

pub mod ease;
pub mod geometry;
