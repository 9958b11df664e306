//! Checksum command: compute SHA-256 of a file, as a manifest `sha256` value.

use anyhow::Result;
use packsync_core::checksum;
use std::path::Path;

/// Compute and print SHA-256 of the given file.
pub fn run_checksum(path: &Path) -> Result<()> {
    let digest = checksum::sha256_path(path)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
