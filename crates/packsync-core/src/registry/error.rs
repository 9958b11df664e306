//! Registry transport/lookup errors.

use std::path::PathBuf;

use super::record::RecordId;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("record {0} not found")]
    NotFound(RecordId),

    #[error("blob {0} not found")]
    BlobNotFound(String),

    #[error("invalid record id {0:?}")]
    InvalidId(String),

    #[error("invalid blob location {0:?}")]
    InvalidLocation(String),

    #[error("registry transport: {0}")]
    Transport(String),

    #[error("registry read failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("record {id} is not a valid record document: {source}")]
    Decode {
        id: RecordId,
        #[source]
        source: serde_json::Error,
    },
}

impl From<curl::Error> for RegistryError {
    fn from(e: curl::Error) -> Self {
        RegistryError::Transport(e.to_string())
    }
}
