// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Document persistence.
//!
//! Documents are stored as JSON values keyed by kind and id. The studio only
//! ever talks to the [`DocumentStore`] trait; the directory layout is one file
//! per document under `<data_dir>/<kind>/<id>.json`.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    Presentation,
    Scene,
    Template,
    Props,
}

impl DocumentKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Presentation => "presentations",
            Self::Scene => "scenes",
            Self::Template => "templates",
            Self::Props => "props",
        }
    }
}

pub trait DocumentStore: Send + Sync {
    fn put(&self, kind: DocumentKind, id: &str, document: serde_json::Value) -> Result<()>;

    fn get(&self, kind: DocumentKind, id: &str) -> Result<Option<serde_json::Value>>;

    /// Stored ids of one kind, sorted.
    fn list(&self, kind: DocumentKind) -> Result<Vec<String>>;

    /// Remove a document. Removing a missing document is not an error.
    fn delete(&self, kind: DocumentKind, id: &str) -> Result<()>;
}

/// Serialize and store a typed document.
pub fn save_document<T: Serialize>(
    store: &dyn DocumentStore,
    kind: DocumentKind,
    id: &str,
    document: &T,
) -> Result<()> {
    store.put(kind, id, serde_json::to_value(document)?)
}

/// Fetch and deserialize a typed document.
pub fn load_document<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    kind: DocumentKind,
    id: &str,
) -> Result<Option<T>> {
    match store.get(kind, id)? {
        Some(value) => {
            let document = serde_json::from_value(value)
                .with_context(|| format!("decoding {:?} '{}'", kind, id))?;
            Ok(Some(document))
        }
        None => Ok(None),
    }
}

fn check_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        bail!("Invalid document id: {:?}", id);
    }
    Ok(())
}

/// One pretty-printed JSON file per document.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, kind: DocumentKind, id: &str) -> Result<PathBuf> {
        check_id(id)?;
        Ok(self.root.join(kind.dir_name()).join(format!("{}.json", id)))
    }
}

impl DocumentStore for DirectoryStore {
    fn put(&self, kind: DocumentKind, id: &str, document: serde_json::Value) -> Result<()> {
        let path = self.path_for(kind, id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&document)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        log::debug!("Stored {}", path.display());
        Ok(())
    }

    fn get(&self, kind: DocumentKind, id: &str) -> Result<Option<serde_json::Value>> {
        let path = self.path_for(kind, id)?;
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        let value = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(value))
    }

    fn list(&self, kind: DocumentKind) -> Result<Vec<String>> {
        let dir = self.root.join(kind.dir_name());
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn delete(&self, kind: DocumentKind, id: &str) -> Result<()> {
        let path = self.path_for(kind, id)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// In-process store, used by tests and headless sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<DocumentKind, BTreeMap<String, serde_json::Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_documents<R>(
        &self,
        f: impl FnOnce(&mut HashMap<DocumentKind, BTreeMap<String, serde_json::Value>>) -> R,
    ) -> Result<R> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| anyhow::anyhow!("document store lock poisoned"))?;
        Ok(f(&mut documents))
    }
}

impl DocumentStore for MemoryStore {
    fn put(&self, kind: DocumentKind, id: &str, document: serde_json::Value) -> Result<()> {
        check_id(id)?;
        self.with_documents(|docs| {
            docs.entry(kind).or_default().insert(id.to_string(), document);
        })
    }

    fn get(&self, kind: DocumentKind, id: &str) -> Result<Option<serde_json::Value>> {
        self.with_documents(|docs| docs.get(&kind).and_then(|m| m.get(id)).cloned())
    }

    fn list(&self, kind: DocumentKind) -> Result<Vec<String>> {
        self.with_documents(|docs| {
            docs.get(&kind)
                .map(|m| m.keys().cloned().collect())
                .unwrap_or_default()
        })
    }

    fn delete(&self, kind: DocumentKind, id: &str) -> Result<()> {
        self.with_documents(|docs| {
            if let Some(m) = docs.get_mut(&kind) {
                m.remove(id);
            }
        })
    }
}
