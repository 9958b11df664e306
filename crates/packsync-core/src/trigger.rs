//! Bootstrap trigger parsing.
//!
//! A scanner hands us an opaque string. A usable one is a URL with the
//! private scheme, a `bootstrap` host (or a path mentioning `bootstrap`), and
//! `container` / `record` query parameters, e.g.
//! `packsync://bootstrap?container=shop&record=bootstrap-main`.
//!
//! Errors display as status text for the user rather than engine failures.

use std::collections::HashMap;
use url::Url;

use crate::registry::RecordId;

const BOOTSTRAP: &str = "bootstrap";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapTrigger {
    /// Registry container (namespace).
    pub container: String,
    /// Bootstrap record id inside the container.
    pub record: RecordId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TriggerError {
    #[error("Unrecognized payload.")]
    Unrecognized,
    #[error("Not a bootstrap URL.")]
    NotBootstrap,
    #[error("Missing container/record in URL.")]
    MissingParams,
}

impl BootstrapTrigger {
    /// Parse `payload`, accepting only URLs whose scheme equals `scheme` (case-insensitive).
    pub fn parse(payload: &str, scheme: &str) -> Result<Self, TriggerError> {
        let url = Url::parse(payload.trim()).map_err(|_| TriggerError::Unrecognized)?;
        if !url.scheme().eq_ignore_ascii_case(scheme) {
            return Err(TriggerError::Unrecognized);
        }

        let host_matches = url
            .host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case(BOOTSTRAP));
        let path_matches = url.path().to_ascii_lowercase().contains(BOOTSTRAP);
        if !host_matches && !path_matches {
            return Err(TriggerError::NotBootstrap);
        }

        // Last occurrence wins for repeated keys.
        let params: HashMap<_, _> = url.query_pairs().collect();
        let container = params.get("container").filter(|v| !v.is_empty());
        let record = params.get("record").filter(|v| !v.is_empty());
        match (container, record) {
            (Some(container), Some(record)) => Ok(Self {
                container: container.to_string(),
                record: RecordId::new(record.to_string()),
            }),
            _ => Err(TriggerError::MissingParams),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEME: &str = "packsync";

    #[test]
    fn parses_host_form() {
        let t = BootstrapTrigger::parse(
            "packsync://bootstrap?container=shop&record=boot-main",
            SCHEME,
        )
        .unwrap();
        assert_eq!(t.container, "shop");
        assert_eq!(t.record.as_str(), "boot-main");
    }

    #[test]
    fn parses_path_form_and_mixed_case() {
        let t = BootstrapTrigger::parse(
            "PackSync://open/Bootstrap/now?record=r1&container=c1",
            SCHEME,
        )
        .unwrap();
        assert_eq!(t.container, "c1");
        assert_eq!(t.record.as_str(), "r1");
    }

    #[test]
    fn decodes_percent_encoding() {
        let t = BootstrapTrigger::parse(
            "packsync://bootstrap?container=my%20shop&record=a%2Bb",
            SCHEME,
        )
        .unwrap();
        assert_eq!(t.container, "my shop");
        assert_eq!(t.record.as_str(), "a+b");
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(
            BootstrapTrigger::parse("https://bootstrap/?container=a&record=b", SCHEME),
            Err(TriggerError::Unrecognized)
        );
        assert_eq!(
            BootstrapTrigger::parse("hello world", SCHEME),
            Err(TriggerError::Unrecognized)
        );
    }

    #[test]
    fn rejects_non_bootstrap() {
        assert_eq!(
            BootstrapTrigger::parse("packsync://settings?container=a&record=b", SCHEME),
            Err(TriggerError::NotBootstrap)
        );
    }

    #[test]
    fn requires_both_params() {
        assert_eq!(
            BootstrapTrigger::parse("packsync://bootstrap?container=a", SCHEME),
            Err(TriggerError::MissingParams)
        );
        assert_eq!(
            BootstrapTrigger::parse("packsync://bootstrap?container=a&record=", SCHEME),
            Err(TriggerError::MissingParams)
        );
    }

    #[test]
    fn errors_read_as_status_text() {
        assert_eq!(TriggerError::NotBootstrap.to_string(), "Not a bootstrap URL.");
        assert_eq!(
            TriggerError::MissingParams.to_string(),
            "Missing container/record in URL."
        );
    }
}
