//! `packsync files` – list cached files by kind.

use anyhow::Result;

use crate::cli::LocalEnv;

pub fn run_files(env: &LocalEnv) -> Result<()> {
    let listing = env.cache.listing()?;
    if listing.media.is_empty() && listing.tables.is_empty() {
        println!("No cached files.");
        return Ok(());
    }
    print_section("Media", &listing.media);
    print_section("Tables", &listing.tables);
    Ok(())
}

fn print_section(title: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    println!("{title}:");
    for name in names {
        println!("  {name}");
    }
}
