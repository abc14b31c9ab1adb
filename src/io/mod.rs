// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O boundaries: files, document storage, broadcast, media and devices.

pub mod broadcast;
pub mod dispatch;
pub mod media;
pub mod serialization;
pub mod sources;
pub mod store;
