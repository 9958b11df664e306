//! Sync failure taxonomy.

use crate::cache::CacheError;
use crate::registry::{RecordError, RegistryError};
use crate::state::StateError;

/// Why a sync attempt failed. The previously committed version stays authoritative.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Bootstrap record lacks a usable `latestPack` reference or `version` integer.
    #[error("invalid bootstrap record: {0}")]
    InvalidBootstrap(#[source] RecordError),

    /// Manifest missing, undecodable, invalid, or its version disagrees with the pack's.
    #[error("malformed pack: {0}")]
    MalformedPack(String),

    #[error("asset {key:?} not found in pack")]
    AssetNotFound { key: String },

    /// Downloaded bytes do not match the declared digest; nothing was written.
    #[error("checksum mismatch for {filename}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        filename: String,
        expected: String,
        actual: String,
    },

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A worker task panicked or was cancelled.
    #[error("sync task failed: {0}")]
    Task(String),
}

/// Fieldless view of [`SyncError`] for matching and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorKind {
    InvalidBootstrap,
    MalformedPack,
    AssetNotFound,
    ChecksumMismatch,
    CacheIo,
    State,
    Registry,
    Task,
}

impl SyncError {
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            SyncError::InvalidBootstrap(_) => SyncErrorKind::InvalidBootstrap,
            SyncError::MalformedPack(_) => SyncErrorKind::MalformedPack,
            SyncError::AssetNotFound { .. } => SyncErrorKind::AssetNotFound,
            SyncError::ChecksumMismatch { .. } => SyncErrorKind::ChecksumMismatch,
            SyncError::Cache(_) => SyncErrorKind::CacheIo,
            SyncError::State(_) => SyncErrorKind::State,
            SyncError::Registry(_) => SyncErrorKind::Registry,
            SyncError::Task(_) => SyncErrorKind::Task,
        }
    }
}
