//! Custom link extraction from a content pack.
//!
//! Two schemas exist: the current one stores a JSON array of URL strings in
//! `customURLs`; the legacy one stores a single URL string in `customURL`.
//! The array wins whenever it decodes. Unparsable URLs are dropped and at
//! most [`MAX_LINKS`] are kept.

use url::Url;

use crate::pack::fields;
use crate::registry::Record;

/// Upper bound on links kept per pack.
pub const MAX_LINKS: usize = 5;

/// Where a pack's links came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSource {
    /// `customURLs` decoded as a JSON string array.
    Array(Vec<String>),
    /// Only the legacy `customURL` string was usable.
    Legacy(String),
    /// Neither field was usable.
    Absent,
}

impl LinkSource {
    pub fn from_record(record: &Record) -> Self {
        if let Ok(json) = record.string(fields::CUSTOM_LINKS) {
            match serde_json::from_str::<Vec<String>>(json) {
                Ok(items) => return LinkSource::Array(items),
                Err(e) => tracing::warn!(
                    "{} is not a JSON string array, trying {}: {}",
                    fields::CUSTOM_LINKS,
                    fields::LEGACY_CUSTOM_LINK,
                    e
                ),
            }
        }
        match record.string(fields::LEGACY_CUSTOM_LINK) {
            Ok(single) => LinkSource::Legacy(single.to_string()),
            Err(_) => LinkSource::Absent,
        }
    }

    /// Raw link strings in order.
    pub fn candidates(&self) -> &[String] {
        match self {
            LinkSource::Array(items) => items,
            LinkSource::Legacy(single) => std::slice::from_ref(single),
            LinkSource::Absent => &[],
        }
    }

    /// Parsed links, invalid entries dropped, truncated to [`MAX_LINKS`].
    pub fn resolve(&self) -> Vec<Url> {
        parse_links(self.candidates())
    }
}

/// Parse link strings, dropping the ones that are not absolute URLs, keeping at most [`MAX_LINKS`].
pub fn parse_links<S: AsRef<str>>(items: &[S]) -> Vec<Url> {
    items
        .iter()
        .filter_map(|s| match Url::parse(s.as_ref()) {
            Ok(u) => Some(u),
            Err(e) => {
                tracing::debug!(link = s.as_ref(), "dropping unparsable link: {}", e);
                None
            }
        })
        .take(MAX_LINKS)
        .collect()
}
