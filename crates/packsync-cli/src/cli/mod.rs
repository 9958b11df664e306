//! CLI for the packsync content pack client.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use packsync_core::cache::AssetCache;
use packsync_core::config::{self, PacksyncConfig};
use packsync_core::state::JsonStateStore;
use std::path::Path;
use std::sync::Arc;

use commands::{
    run_checksum, run_clear, run_completions, run_files, run_links, run_man, run_preview,
    run_status, run_sync,
};

/// Top-level CLI for packsync.
#[derive(Debug, Parser)]
#[command(name = "packsync")]
#[command(about = "packsync: checksum-verified content pack sync into a local cache", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Sync the content pack named by a bootstrap trigger URL.
    Sync {
        /// Trigger payload, e.g. packsync://bootstrap?container=shop&record=boot.
        trigger: String,
    },

    /// Show the committed version and cache location.
    Status,

    /// List the custom links stored by the last pack fetch.
    Links,

    /// List cached files, grouped into media and tables.
    Files,

    /// Print the beginning of a cached file as text.
    Preview {
        /// Cached file name.
        filename: String,
        /// Read at most N bytes (default from config).
        #[arg(long, value_name = "N")]
        max_bytes: Option<usize>,
    },

    /// Delete all cached files and stored links and reset the version.
    Clear,

    /// Compute SHA-256 of a file (e.g. to author a manifest).
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

/// Local side of the client: config plus the cache and state it points at.
pub(crate) struct LocalEnv {
    pub cfg: PacksyncConfig,
    pub cache: AssetCache,
    pub state: Arc<JsonStateStore>,
}

impl LocalEnv {
    /// Load (or create) the config and open the cache and state it names.
    fn load() -> Result<Self> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let cache_root = cfg.resolved_cache_root()?;
        let cache = AssetCache::open(&cache_root, &cfg.cache_namespace)
            .with_context(|| format!("open cache under {}", cache_root.display()))?;
        let state = Arc::new(JsonStateStore::new(cfg.resolved_state_path()?));
        Ok(Self { cfg, cache, state })
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Sync { trigger } => run_sync(&LocalEnv::load()?, &trigger).await?,
            CliCommand::Status => run_status(&LocalEnv::load()?)?,
            CliCommand::Links => run_links(&LocalEnv::load()?)?,
            CliCommand::Files => run_files(&LocalEnv::load()?)?,
            CliCommand::Preview {
                filename,
                max_bytes,
            } => run_preview(&LocalEnv::load()?, &filename, max_bytes)?,
            CliCommand::Clear => run_clear(&LocalEnv::load()?)?,
            CliCommand::Checksum { path } => run_checksum(Path::new(&path))?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
