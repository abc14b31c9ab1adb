// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Change notifications for other windows (output, remote panels).
//!
//! Publishing is fire-and-forget. Payloads carry the whole updated object and
//! receivers keep only what arrived last.

use crate::models::lower_third::{LowerThirdData, LowerThirdTemplate};
use crate::models::presentation::Presentation;
use crate::models::props::PropItem;
use crate::models::scene::Scene;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

/// A lower third as sent to the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowerThirdCue {
    pub data: LowerThirdData,
    pub template: LowerThirdTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BroadcastEvent {
    TemplatesChanged(Vec<LowerThirdTemplate>),
    SceneChanged(Scene),
    StudioSlidesChanged(Presentation),
    /// `None` hides the live lower third.
    LowerThirdLive(Option<LowerThirdCue>),
    PropsChanged(Vec<PropItem>),
}

impl BroadcastEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TemplatesChanged(_) => "templates-changed",
            Self::SceneChanged(_) => "scene-changed",
            Self::StudioSlidesChanged(_) => "studio-slides-changed",
            Self::LowerThirdLive(_) => "lower-third-live",
            Self::PropsChanged(_) => "props-changed",
        }
    }
}

pub trait Broadcaster: Send + Sync {
    fn publish(&self, event: BroadcastEvent) -> Result<()>;
}

/// Broadcaster that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBroadcaster;

impl Broadcaster for NullBroadcaster {
    fn publish(&self, _event: BroadcastEvent) -> Result<()> {
        Ok(())
    }
}

/// In-process fan-out over std channels.
#[derive(Debug, Default)]
pub struct ChannelBroadcaster {
    subscribers: Mutex<Vec<Sender<BroadcastEvent>>>,
}

impl ChannelBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Result<Subscription> {
        let (sender, receiver) = channel();
        self.subscribers
            .lock()
            .map_err(|_| anyhow::anyhow!("subscriber list lock poisoned"))?
            .push(sender);
        Ok(Subscription { receiver })
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn publish(&self, event: BroadcastEvent) -> Result<()> {
        let mut subscribers = self
            .subscribers
            .lock()
            .map_err(|_| anyhow::anyhow!("subscriber list lock poisoned"))?;
        // drop receivers that went away
        subscribers.retain(|s| s.send(event.clone()).is_ok());
        log::debug!(
            "Broadcast {} to {} subscriber(s)",
            event.name(),
            subscribers.len()
        );
        Ok(())
    }
}

pub struct Subscription {
    receiver: Receiver<BroadcastEvent>,
}

impl Subscription {
    /// Everything received since the last call, oldest first.
    pub fn drain(&self) -> Vec<BroadcastEvent> {
        self.receiver.try_iter().collect()
    }

    /// The most recent event, discarding older ones.
    pub fn latest(&self) -> Option<BroadcastEvent> {
        self.receiver.try_iter().last()
    }
}
