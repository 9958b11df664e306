//! `packsync links` – show stored custom links.

use anyhow::Result;
use packsync_core::state::StateStore;

use crate::cli::LocalEnv;

pub fn run_links(env: &LocalEnv) -> Result<()> {
    let links = env.state.load()?.links();
    if links.is_empty() {
        println!("No custom links stored.");
    } else {
        for (i, url) in links.iter().enumerate() {
            println!("{:>2}. {}", i + 1, url);
        }
    }
    Ok(())
}
