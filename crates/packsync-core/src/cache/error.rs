//! Error type for local cache operations.

use std::path::{Path, PathBuf};

use super::filename::FilenameProblem;

/// Failure of a cache operation. Filesystem errors are carried verbatim.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache {op} failed for {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid cache filename {name:?}: {problem}")]
    InvalidFilename {
        name: String,
        problem: FilenameProblem,
    },
}

impl CacheError {
    pub(crate) fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        CacheError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}
