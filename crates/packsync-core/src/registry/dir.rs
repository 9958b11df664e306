//! Registry container stored in a local directory.
//!
//! Layout: `<root>/records/<id>.json` holds record documents; blob locations
//! are paths relative to `<root>`.

use std::path::{Component, Path, PathBuf};

use super::error::RegistryError;
use super::record::{BlobHandle, Record, RecordId};
use super::{Registry, RECORDS_DIR, RECORD_EXTENSION};
use crate::cache::check_filename;

#[derive(Debug, Clone)]
pub struct DirRegistry {
    root: PathBuf,
}

impl DirRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, id: &RecordId) -> Result<PathBuf, RegistryError> {
        check_filename(id.as_str()).map_err(|_| RegistryError::InvalidId(id.to_string()))?;
        Ok(self
            .root
            .join(RECORDS_DIR)
            .join(format!("{}.{}", id, RECORD_EXTENSION)))
    }

    fn blob_path(&self, blob: &BlobHandle) -> Result<PathBuf, RegistryError> {
        let rel = Path::new(blob.location());
        let plain = !blob.location().is_empty()
            && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(RegistryError::InvalidLocation(blob.location().to_string()));
        }
        Ok(self.root.join(rel))
    }
}

impl Registry for DirRegistry {
    fn fetch_record(&self, id: &RecordId) -> Result<Record, RegistryError> {
        let path = self.record_path(id)?;
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RegistryError::NotFound(id.clone()))
            }
            Err(source) => return Err(RegistryError::Io { path, source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| RegistryError::Decode {
            id: id.clone(),
            source,
        })
    }

    fn fetch_blob(&self, blob: &BlobHandle) -> Result<Vec<u8>, RegistryError> {
        let path = self.blob_path(blob)?;
        match std::fs::read(&path) {
            Ok(b) => Ok(b),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RegistryError::BlobNotFound(blob.location().to_string()))
            }
            Err(source) => Err(RegistryError::Io { path, source }),
        }
    }
}
