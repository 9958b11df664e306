//! `packsync clear` – wipe the local cache.

use anyhow::Result;
use packsync_core::sync;

use crate::cli::LocalEnv;

pub fn run_clear(env: &LocalEnv) -> Result<()> {
    sync::clear_local(&env.cache, &*env.state)?;
    println!("Cache cleared.");
    Ok(())
}
