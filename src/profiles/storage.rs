//! Document store contract and the filesystem implementation behind it.
//!
//! The engine never chooses file names or paths on its own; everything goes
//! through the id-keyed store so the persistence mechanics stay swappable.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Result returned after writing a document.
#[derive(Debug, Clone)]
pub struct DocumentWriteOutcome {
    pub path: PathBuf,
    pub hash: String,
}

/// Id-keyed read/write/list/delete over named collections.
pub trait DocumentStore {
    fn read_document(&self, collection: &str, id: &str) -> Result<Option<Value>>;
    fn write_document(&self, collection: &str, id: &str, payload: &Value)
        -> Result<DocumentWriteOutcome>;
    fn list_documents(&self, collection: &str) -> Result<Vec<String>>;
    fn delete_document(&self, collection: &str, id: &str) -> Result<()>;
}

/// Filesystem-backed store writing pretty JSON under `root/<collection>/`.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn document_path(&self, collection: &str, id: &str) -> PathBuf {
        self.root.join(collection).join(format!("{id}.json"))
    }
}

impl DocumentStore for FsDocumentStore {
    fn read_document(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let path = self.document_path(collection, id);
        if !path.exists() {
            return Ok(None);
        }
        let data =
            fs::read(&path).with_context(|| format!("Failed reading document {path:?}"))?;
        let value = serde_json::from_slice(&data)
            .with_context(|| format!("Failed parsing document {path:?}"))?;
        Ok(Some(value))
    }

    fn write_document(
        &self,
        collection: &str,
        id: &str,
        payload: &Value,
    ) -> Result<DocumentWriteOutcome> {
        let path = self.document_path(collection, id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed creating collection directory {parent:?}"))?;
        }
        let bytes = serde_json::to_vec_pretty(payload)
            .with_context(|| format!("Failed serializing document {path:?}"))?;
        let hash = compute_hash(&bytes);
        let mut file = fs::File::create(&path)
            .with_context(|| format!("Failed opening document {path:?}"))?;
        file.write_all(&bytes)?;
        Ok(DocumentWriteOutcome { path, hash })
    }

    fn list_documents(&self, collection: &str) -> Result<Vec<String>> {
        let dir = self.root.join(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(id) = name.strip_suffix(".json") {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        let path = self.document_path(collection, id);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed deleting document {path:?}"))?;
        }
        Ok(())
    }
}

/// Reads and deserializes a typed document if it exists.
pub fn read_typed<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>> {
    match store.read_document(collection, id)? {
        Some(value) => {
            let typed = serde_json::from_value(value)
                .with_context(|| format!("Failed decoding {collection}/{id}"))?;
            Ok(Some(typed))
        }
        None => Ok(None),
    }
}

/// Serializes and writes a typed document.
pub fn write_typed<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    value: &T,
) -> Result<DocumentWriteOutcome> {
    let payload = serde_json::to_value(value)
        .with_context(|| format!("Failed encoding {collection}/{id}"))?;
    store.write_document(collection, id, &payload)
}

/// Computes a lowercase hex SHA-256 hash of the provided bytes.
pub fn compute_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}
