//! Registry client interface.
//!
//! The sync engine only depends on the [`Registry`] trait: record lookup by
//! id and blob retrieval by handle. Backends for a local directory, HTTP(S)
//! and in-process use are provided.

mod dir;
mod error;
mod http;
mod memory;
mod record;

pub use dir::DirRegistry;
pub use error::RegistryError;
pub use http::HttpRegistry;
pub use memory::MemoryRegistry;
pub use record::{BlobHandle, FieldKind, FieldValue, Record, RecordError, RecordId};

use std::path::Path;
use std::sync::Arc;

use crate::cache::check_filename;

/// Directory (or URL path segment) holding record documents.
pub(crate) const RECORDS_DIR: &str = "records";
pub(crate) const RECORD_EXTENSION: &str = "json";

/// Remote store of typed records and binary blobs.
///
/// Calls block; call from `spawn_blocking` if used from async code.
pub trait Registry: Send + Sync {
    /// Fetch a record; `RegistryError::NotFound` if the id is absent.
    fn fetch_record(&self, id: &RecordId) -> Result<Record, RegistryError>;

    /// Fetch the full content of a blob referenced by a record field.
    fn fetch_blob(&self, blob: &BlobHandle) -> Result<Vec<u8>, RegistryError>;
}

/// Open the registry container `container` under `root`.
///
/// `http://` and `https://` roots select [`HttpRegistry`]; anything else is a
/// directory path for [`DirRegistry`]. The container name is appended as one
/// path segment.
pub fn open(root: &str, container: &str) -> Result<Arc<dyn Registry>, RegistryError> {
    check_filename(container).map_err(|_| RegistryError::InvalidId(container.to_string()))?;
    let lower = root.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        let reg = HttpRegistry::new(root)?;
        let base = reg.url_with([container]);
        tracing::debug!(%base, "using HTTP registry");
        Ok(Arc::new(HttpRegistry::new(base.as_str())?))
    } else {
        let dir = Path::new(root).join(container);
        tracing::debug!(dir = %dir.display(), "using directory registry");
        Ok(Arc::new(DirRegistry::new(dir)))
    }
}
