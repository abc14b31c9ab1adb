// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Document import and export.
//!
//! Scenes, presentations and template lists are written as YAML or JSON,
//! chosen by file extension.

use crate::error::{StudioError, StudioResult};
use crate::models::lower_third::LowerThirdTemplate;
use anyhow::{bail, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|s| s.to_str());
        match extension {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => bail!("Unsupported file extension: {:?}", extension),
        }
    }
}

/// Export a document to YAML format.
pub fn export_yaml<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export a document to JSON format.
pub fn export_json<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import a document from YAML format.
pub fn import_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Import a document from JSON format.
pub fn import_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Export using the format implied by the extension.
pub fn export<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    match Format::from_path(path)? {
        Format::Yaml => export_yaml(data, path),
        Format::Json => export_json(data, path),
    }
}

/// Import using the format implied by the extension.
pub fn import<T: DeserializeOwned>(path: &Path) -> Result<T> {
    match Format::from_path(path)? {
        Format::Yaml => import_yaml(path),
        Format::Json => import_json(path),
    }
}

/// Parse a pasted or imported template list.
///
/// Accepts either a JSON array or a single template object. Every template is
/// validated and ids must be unique; any failure rejects the whole input.
pub fn parse_templates(text: &str) -> StudioResult<Vec<LowerThirdTemplate>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let templates: Vec<LowerThirdTemplate> = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(value)?],
        _ => {
            return Err(StudioError::validation(
                "expected a template object or an array of templates",
            ))
        }
    };

    let mut seen = HashSet::new();
    for template in &templates {
        template.validate()?;
        if !seen.insert(template.id.as_str()) {
            return Err(StudioError::validation(format!(
                "duplicate template id '{}'",
                template.id
            )));
        }
    }
    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scene::{Scene, SceneGraph};
    use crate::models::content::LayerContent;

    #[test]
    fn test_scene_yaml_and_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut graph = SceneGraph::new(Scene::new("s1", "Main"));
        graph.add_layer(
            LayerContent::StaticImage {
                path: "media/logo.png".to_string(),
            },
            Some("Logo"),
        );

        for name in ["scene.yaml", "scene.json"] {
            let path = dir.path().join(name);
            export(graph.scene(), &path).unwrap();
            let back: Scene = import(&path).unwrap();
            assert_eq!(&back, graph.scene());
        }
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.txt");
        assert!(export(&Scene::new("s", "S"), &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_parse_templates_accepts_object_or_array() {
        let single = parse_templates(r#"{"id": "a", "name": "A"}"#).unwrap();
        assert_eq!(single.len(), 1);

        let list = parse_templates(r#"[{"id": "a"}, {"id": "b"}]"#).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_parse_templates_fails_closed() {
        assert!(parse_templates("not json").is_err());
        assert!(parse_templates("42").is_err());
        assert!(parse_templates(r#"[{"id": "a"}, {"id": "a"}]"#).is_err());
        assert!(
            parse_templates(r#"[{"id": "a"}, {"id": "b", "autoHideSeconds": 120}]"#).is_err()
        );
    }
}
