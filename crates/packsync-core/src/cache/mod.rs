//! Directory-backed asset cache.
//!
//! One flat namespace directory, one file per asset. Writes go to a hidden
//! `.part` temp file in the same directory, are synced, then renamed over the
//! final name so readers never see a partially written asset.

mod error;
mod filename;

pub use error::CacheError;
pub use filename::{check_filename, FilenameProblem};

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Extension the presentation layer treats as tabular text.
const TABLE_EXTENSION: &str = "csv";

/// How the presentation layer renders a cached file, decided by extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Tabular text (`.csv`), previewed as text.
    Table,
    /// Anything else (images and other media).
    Media,
}

impl AssetKind {
    pub fn of(filename: &str) -> Self {
        match Path::new(filename).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(TABLE_EXTENSION) => AssetKind::Table,
            _ => AssetKind::Media,
        }
    }
}

/// Cache contents split by [`AssetKind`]. Both lists are sorted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheListing {
    pub media: Vec<String>,
    pub tables: Vec<String>,
}

/// Handle to the cache namespace directory. Cheap to clone; holds no open files.
#[derive(Debug, Clone)]
pub struct AssetCache {
    dir: PathBuf,
}

impl AssetCache {
    /// Open the namespace `root/namespace`, creating it (and missing ancestors) if absent.
    pub fn open(root: &Path, namespace: &str) -> Result<Self, CacheError> {
        check_filename(namespace).map_err(|problem| CacheError::InvalidFilename {
            name: namespace.to_string(),
            problem,
        })?;
        let dir = root.join(namespace);
        fs::create_dir_all(&dir).map_err(|e| CacheError::io("create", &dir, e))?;
        Ok(Self { dir })
    }

    /// Namespace directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `filename` inside the namespace. Validates the name.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, CacheError> {
        check_filename(filename).map_err(|problem| CacheError::InvalidFilename {
            name: filename.to_string(),
            problem,
        })?;
        Ok(self.dir.join(filename))
    }

    /// Write `bytes` as `filename`, replacing any existing file atomically.
    ///
    /// Safe to call concurrently for different filenames: every call gets its
    /// own temp file.
    pub fn write(&self, filename: &str, bytes: &[u8]) -> Result<(), CacheError> {
        let final_path = self.path_for(filename)?;
        let mut tmp = tempfile::Builder::new()
            .prefix(".")
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.dir)
            .map_err(|e| CacheError::io("create temp", &self.dir, e))?;
        tmp.write_all(bytes)
            .map_err(|e| CacheError::io("write", tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| CacheError::io("sync", tmp.path(), e))?;
        tmp.persist(&final_path)
            .map_err(|e| CacheError::io("rename", &final_path, e.error))?;
        tracing::debug!(file = %filename, bytes = bytes.len(), "cached asset");
        Ok(())
    }

    /// File names in the namespace, sorted, excluding hidden entries and directories.
    pub fn list(&self) -> Result<Vec<String>, CacheError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| CacheError::io("list", &self.dir, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::io("list", &self.dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| CacheError::io("stat", &entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// [`list`](Self::list) split into media and tabular assets.
    pub fn listing(&self) -> Result<CacheListing, CacheError> {
        let mut listing = CacheListing::default();
        for name in self.list()? {
            match AssetKind::of(&name) {
                AssetKind::Table => listing.tables.push(name),
                AssetKind::Media => listing.media.push(name),
            }
        }
        Ok(listing)
    }

    /// Remove the namespace and recreate it empty.
    pub fn remove_all(&self) -> Result<(), CacheError> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(CacheError::io("remove", &self.dir, e)),
        }
        fs::create_dir_all(&self.dir).map_err(|e| CacheError::io("create", &self.dir, e))?;
        tracing::info!(dir = %self.dir.display(), "cache cleared");
        Ok(())
    }

    /// Read at most `max_bytes` of `filename`. Longer content is truncated, not an error.
    pub fn read(&self, filename: &str, max_bytes: usize) -> Result<Vec<u8>, CacheError> {
        let path = self.path_for(filename)?;
        let file = fs::File::open(&path).map_err(|e| CacheError::io("open", &path, e))?;
        let mut buf = Vec::new();
        file.take(max_bytes as u64)
            .read_to_end(&mut buf)
            .map_err(|e| CacheError::io("read", &path, e))?;
        Ok(buf)
    }

    /// Bounded read decoded as UTF-8, replacing invalid sequences.
    pub fn read_text_preview(&self, filename: &str, max_bytes: usize) -> Result<String, CacheError> {
        let bytes = self.read(filename, max_bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
