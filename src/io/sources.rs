// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Camera and device listing.

use crate::models::content::SourceRef;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    /// Attached to this machine
    Local,
    /// Phone or remote camera on the network
    Lan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDevice {
    pub id: String,
    pub name: String,
    pub origin: SourceOrigin,
}

impl SourceDevice {
    /// Display name, falling back to the id when the device reports none.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn to_source_ref(&self) -> SourceRef {
        match self.origin {
            SourceOrigin::Local => SourceRef::LocalCamera {
                device_id: self.id.clone(),
            },
            SourceOrigin::Lan => SourceRef::LanCamera {
                device_id: self.id.clone(),
            },
        }
    }
}

/// Enumerates cameras available as layer sources.
pub trait SourceDirectory {
    fn devices(&self) -> Result<Vec<SourceDevice>>;
}

/// Fixed device list.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    pub devices: Vec<SourceDevice>,
}

impl SourceDirectory for StaticDirectory {
    fn devices(&self) -> Result<Vec<SourceDevice>> {
        Ok(self.devices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_refs_by_origin() {
        let directory = StaticDirectory {
            devices: vec![
                SourceDevice {
                    id: "usb-0".to_string(),
                    name: String::new(),
                    origin: SourceOrigin::Local,
                },
                SourceDevice {
                    id: "phone-7".to_string(),
                    name: "Balcony".to_string(),
                    origin: SourceOrigin::Lan,
                },
            ],
        };
        let devices = directory.devices().unwrap();
        assert_eq!(devices[0].label(), "usb-0");
        assert_eq!(devices[1].label(), "Balcony");
        assert_eq!(
            devices[0].to_source_ref(),
            SourceRef::LocalCamera {
                device_id: "usb-0".to_string()
            }
        );
        assert_eq!(
            devices[1].to_source_ref(),
            SourceRef::LanCamera {
                device_id: "phone-7".to_string()
            }
        );
    }
}
