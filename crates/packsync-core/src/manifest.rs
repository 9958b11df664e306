//! Pack manifest: the authoritative asset list of one pack version.
//!
//! Decoded from the JSON blob stored in the pack's `manifest` field. Every
//! field is required; descriptors are validated after decoding so the
//! orchestrator never starts a download with an ambiguous manifest.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::cache::{check_filename, FilenameProblem};
use crate::checksum::is_sha256_hex;

/// One asset of a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// Blob field name on the pack record.
    pub key: String,
    /// Cache file name (single path segment).
    pub filename: String,
    /// Expected SHA-256, lowercase hex.
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackManifest {
    pub version: i64,
    pub assets: Vec<AssetDescriptor>,
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON for the expected schema: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("duplicate asset key {0:?}")]
    DuplicateKey(String),

    #[error("duplicate asset filename {0:?}")]
    DuplicateFilename(String),

    #[error("asset {key:?} has invalid filename {filename:?}: {problem}")]
    InvalidFilename {
        key: String,
        filename: String,
        problem: FilenameProblem,
    },

    #[error("asset {key:?} has invalid sha256 {sha256:?}")]
    InvalidDigest { key: String, sha256: String },
}

impl PackManifest {
    /// Decode and validate a manifest blob. Digests are normalized to lowercase.
    pub fn decode(bytes: &[u8]) -> Result<Self, ManifestError> {
        let mut manifest: PackManifest = serde_json::from_slice(bytes)?;
        manifest.validate()?;
        for asset in &mut manifest.assets {
            asset.sha256.make_ascii_lowercase();
        }
        Ok(manifest)
    }

    /// Check descriptor invariants: unique keys, unique single-segment
    /// filenames, well-formed digests.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut keys = HashSet::new();
        let mut filenames = HashSet::new();
        for asset in &self.assets {
            if !keys.insert(asset.key.as_str()) {
                return Err(ManifestError::DuplicateKey(asset.key.clone()));
            }
            check_filename(&asset.filename).map_err(|problem| ManifestError::InvalidFilename {
                key: asset.key.clone(),
                filename: asset.filename.clone(),
                problem,
            })?;
            if !filenames.insert(asset.filename.as_str()) {
                return Err(ManifestError::DuplicateFilename(asset.filename.clone()));
            }
            if !is_sha256_hex(&asset.sha256) {
                return Err(ManifestError::InvalidDigest {
                    key: asset.key.clone(),
                    sha256: asset.sha256.clone(),
                });
            }
        }
        Ok(())
    }
}
