//! `packsync preview` – print the head of a cached file.

use anyhow::{Context, Result};

use crate::cli::LocalEnv;

pub fn run_preview(env: &LocalEnv, filename: &str, max_bytes: Option<usize>) -> Result<()> {
    let max_bytes = max_bytes.unwrap_or(env.cfg.preview_max_bytes);
    let text = env
        .cache
        .read_text_preview(filename, max_bytes)
        .with_context(|| format!("preview {filename}"))?;
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}
