//! Typed views over the two remote records the sync reads: the bootstrap
//! pointer and the content pack.

use crate::links::LinkSource;
use crate::registry::{BlobHandle, Record, RecordError, RecordId};

/// Record field names.
pub mod fields {
    /// Bootstrap: reference to the current content pack.
    pub const LATEST_PACK: &str = "latestPack";
    /// Bootstrap and pack: integer version.
    pub const VERSION: &str = "version";
    /// Pack: manifest blob.
    pub const MANIFEST: &str = "manifest";
    /// Pack: JSON array of link strings (current schema).
    pub const CUSTOM_LINKS: &str = "customURLs";
    /// Pack: single link string (legacy schema).
    pub const LEGACY_CUSTOM_LINK: &str = "customURL";
}

/// Small published record naming the current pack and its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapPointer {
    pub latest_pack: RecordId,
    pub version: i64,
}

impl BootstrapPointer {
    pub fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            latest_pack: record.reference(fields::LATEST_PACK)?.clone(),
            version: record.integer(fields::VERSION)?,
        })
    }
}

/// A fetched content pack record.
#[derive(Debug, Clone)]
pub struct ContentPack {
    id: RecordId,
    record: Record,
}

impl ContentPack {
    pub fn new(id: RecordId, record: Record) -> Self {
        Self { id, record }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Declared pack version; must agree with the manifest's.
    pub fn version(&self) -> Result<i64, RecordError> {
        self.record.integer(fields::VERSION)
    }

    pub fn manifest_blob(&self) -> Result<&BlobHandle, RecordError> {
        self.record.blob(fields::MANIFEST)
    }

    /// Blob field for a manifest asset key.
    pub fn asset_blob(&self, key: &str) -> Result<&BlobHandle, RecordError> {
        self.record.blob(key)
    }

    pub fn link_source(&self) -> LinkSource {
        LinkSource::from_record(&self.record)
    }
}
