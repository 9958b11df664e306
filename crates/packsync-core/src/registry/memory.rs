//! In-process registry. Counts fetches so callers can assert what was touched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use super::error::RegistryError;
use super::record::{BlobHandle, Record, RecordId};
use super::Registry;

#[derive(Debug, Default)]
pub struct MemoryRegistry {
    records: RwLock<HashMap<RecordId, Record>>,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    record_fetches: AtomicUsize,
    blob_fetches: Mutex<Vec<String>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_record(&self, id: impl Into<RecordId>, record: Record) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.into(), record);
    }

    /// Store `bytes` and return a handle pointing at them.
    pub fn insert_blob(&self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> BlobHandle {
        let location = location.into();
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(location.clone(), bytes.into());
        BlobHandle::new(location)
    }

    pub fn record_fetch_count(&self) -> usize {
        self.record_fetches.load(Ordering::Relaxed)
    }

    /// Locations passed to `fetch_blob`, in call order.
    pub fn blob_fetches(&self) -> Vec<String> {
        self.blob_fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Registry for MemoryRegistry {
    fn fetch_record(&self, id: &RecordId) -> Result<Record, RegistryError> {
        self.record_fetches.fetch_add(1, Ordering::Relaxed);
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    fn fetch_blob(&self, blob: &BlobHandle) -> Result<Vec<u8>, RegistryError> {
        self.blob_fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(blob.location().to_string());
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(blob.location())
            .cloned()
            .ok_or_else(|| RegistryError::BlobNotFound(blob.location().to_string()))
    }
}
