//! Registry container served over HTTP(S).
//!
//! Same layout as [`super::DirRegistry`] under a base URL:
//! `GET <base>/records/<id>.json` and `GET <base>/<blob location>`.
//! Uses libcurl through the curl crate; calls block, so async callers run
//! them on the blocking pool.

use std::time::Duration;
use url::Url;

use super::error::RegistryError;
use super::record::{BlobHandle, Record, RecordId};
use super::{Registry, RECORDS_DIR, RECORD_EXTENSION};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct HttpRegistry {
    base: Url,
}

impl HttpRegistry {
    /// `base` must be an absolute http(s) URL that can carry path segments.
    pub fn new(base: &str) -> Result<Self, RegistryError> {
        let base = Url::parse(base)
            .map_err(|e| RegistryError::Transport(format!("invalid registry URL {base:?}: {e}")))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(RegistryError::Transport(format!(
                "registry URL must be http(s): {base}"
            )));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Base URL with `segments` appended (each one percent-encoded).
    pub(crate) fn url_with<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET `url`. `Ok(None)` on HTTP 404.
    fn get(&self, url: &Url) -> Result<Option<Vec<u8>>, RegistryError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(CONNECT_TIMEOUT)?;
        easy.timeout(TRANSFER_TIMEOUT)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        tracing::debug!(%url, code, bytes = body.len(), "registry GET");
        match code {
            200..=299 => Ok(Some(body)),
            404 => Ok(None),
            _ => Err(RegistryError::Transport(format!("GET {url} returned HTTP {code}"))),
        }
    }
}

impl Registry for HttpRegistry {
    fn fetch_record(&self, id: &RecordId) -> Result<Record, RegistryError> {
        if id.as_str().is_empty() {
            return Err(RegistryError::InvalidId(String::new()));
        }
        let doc = format!("{}.{}", id, RECORD_EXTENSION);
        let url = self.url_with([RECORDS_DIR, doc.as_str()]);
        let bytes = self
            .get(&url)?
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        serde_json::from_slice(&bytes).map_err(|source| RegistryError::Decode {
            id: id.clone(),
            source,
        })
    }

    fn fetch_blob(&self, blob: &BlobHandle) -> Result<Vec<u8>, RegistryError> {
        let segments: Vec<&str> = blob.location().split('/').collect();
        if segments.iter().any(|s| s.is_empty() || *s == "." || *s == "..") {
            return Err(RegistryError::InvalidLocation(blob.location().to_string()));
        }
        let url = self.url_with(segments);
        self.get(&url)?
            .ok_or_else(|| RegistryError::BlobNotFound(blob.location().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_record_and_blob_urls() {
        let reg = HttpRegistry::new("https://cdn.example.com/registry/shop/").unwrap();
        assert_eq!(
            reg.url_with(["records", "boot.json"]).as_str(),
            "https://cdn.example.com/registry/shop/records/boot.json"
        );
        let reg = HttpRegistry::new("https://cdn.example.com/registry/shop").unwrap();
        assert_eq!(
            reg.url_with(["blobs", "hero image.png"]).as_str(),
            "https://cdn.example.com/registry/shop/blobs/hero%20image.png"
        );
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(HttpRegistry::new("ftp://example.com/x").is_err());
        assert!(HttpRegistry::new("mailto:someone@example.com").is_err());
        assert!(HttpRegistry::new("not a url").is_err());
    }

    #[test]
    fn rejects_dot_segments_in_blob_location() {
        let reg = HttpRegistry::new("https://cdn.example.com/r").unwrap();
        assert!(matches!(
            reg.fetch_blob(&BlobHandle::new("../secret")),
            Err(RegistryError::InvalidLocation(_))
        ));
        assert!(matches!(
            reg.fetch_blob(&BlobHandle::new("blobs//a.png")),
            Err(RegistryError::InvalidLocation(_))
        ));
    }
}
