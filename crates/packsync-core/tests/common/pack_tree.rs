//! Registry container contents built in memory, then written to a directory
//! or served over HTTP.
//!
//! Layout matches both backends: `records/<id>.json` and blob paths relative
//! to the container root.

use std::collections::BTreeMap;
use std::path::Path;

use packsync_core::checksum::sha256_hex;
use packsync_core::pack::fields;
use packsync_core::registry::{BlobHandle, FieldValue, Record, RecordId};

pub const BOOTSTRAP: &str = "bootstrap";

#[derive(Debug, Default, Clone)]
pub struct PackTree {
    files: BTreeMap<String, Vec<u8>>,
}

impl PackTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_record(&mut self, id: &str, record: &Record) {
        let body = serde_json::to_vec_pretty(record).unwrap();
        self.files.insert(format!("records/{id}.json"), body);
    }

    pub fn put_blob(&mut self, location: &str, bytes: &[u8]) -> BlobHandle {
        self.files.insert(location.to_string(), bytes.to_vec());
        BlobHandle::new(location)
    }

    /// Publish pack `pack-<version>` holding `assets` (key, filename, bytes)
    /// and point the bootstrap record at it. `links` is stored as the JSON
    /// array field when given.
    pub fn publish(&mut self, version: i64, assets: &[(&str, &str, &[u8])], links: Option<&str>) {
        let pack_id = format!("pack-{version}");
        let descriptors: Vec<_> = assets
            .iter()
            .map(|(key, filename, bytes)| {
                serde_json::json!({ "key": key, "filename": filename, "sha256": sha256_hex(bytes) })
            })
            .collect();
        let manifest = serde_json::json!({ "version": version, "assets": descriptors });
        let manifest = self.put_blob(
            &format!("blobs/{pack_id}/manifest.json"),
            &serde_json::to_vec(&manifest).unwrap(),
        );

        let mut pack = Record::new()
            .with(fields::VERSION, FieldValue::Integer(version))
            .with(fields::MANIFEST, FieldValue::Blob(manifest));
        for (key, _, bytes) in assets {
            let blob = self.put_blob(&format!("blobs/{pack_id}/{key}"), bytes);
            pack.insert(*key, FieldValue::Blob(blob));
        }
        if let Some(links) = links {
            pack.insert(fields::CUSTOM_LINKS, FieldValue::String(links.to_string()));
        }
        self.put_record(&pack_id, &pack);

        let bootstrap = Record::new()
            .with(fields::LATEST_PACK, FieldValue::Reference(RecordId::new(pack_id)))
            .with(fields::VERSION, FieldValue::Integer(version));
        self.put_record(BOOTSTRAP, &bootstrap);
    }

    pub fn write_to(&self, root: &Path) {
        for (rel, body) in &self.files {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, body).unwrap();
        }
    }

    /// Files keyed by path relative to the container, prefixed with `prefix/`.
    pub fn routes(&self, prefix: &str) -> BTreeMap<String, Vec<u8>> {
        self.files
            .iter()
            .map(|(rel, body)| (format!("/{prefix}/{rel}"), body.clone()))
            .collect()
    }
}
