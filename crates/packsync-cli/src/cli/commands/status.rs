//! `packsync status` – show the committed version and cache summary.

use anyhow::Result;
use packsync_core::state::StateStore;

use crate::cli::LocalEnv;

pub fn run_status(env: &LocalEnv) -> Result<()> {
    let state = env.state.load()?;
    let files = env.cache.list()?;
    if state.current_version == 0 {
        println!("{:<10} none", "VERSION");
    } else {
        println!("{:<10} {}", "VERSION", state.current_version);
    }
    println!("{:<10} {}", "FILES", files.len());
    println!("{:<10} {}", "LINKS", state.links().len());
    println!("{:<10} {}", "CACHE", env.cache.dir().display());
    println!("{:<10} {}", "STATE", env.state.path().display());
    println!("{:<10} {}", "REGISTRY", env.cfg.registry_root);
    Ok(())
}
