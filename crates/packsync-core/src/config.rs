use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Global configuration loaded from `~/.config/packsync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacksyncConfig {
    /// Where registry containers live: an `http(s)://` base URL or a local directory.
    /// The trigger's container name is appended as a path segment.
    pub registry_root: String,
    /// Name of the cache namespace directory.
    pub cache_namespace: String,
    /// URL scheme accepted for bootstrap triggers.
    pub trigger_scheme: String,
    /// Maximum assets downloaded and verified concurrently during one sync.
    pub max_concurrent_assets: usize,
    /// Read cap for text previews of cached files.
    pub preview_max_bytes: usize,
    /// Parent directory of the cache namespace (default: XDG data home).
    #[serde(default)]
    pub cache_root: Option<PathBuf>,
    /// State file holding the current version and stored links (default: XDG state home).
    #[serde(default)]
    pub state_path: Option<PathBuf>,
}

impl Default for PacksyncConfig {
    fn default() -> Self {
        Self {
            registry_root: "https://registry.example.invalid".to_string(),
            cache_namespace: "packsync-assets".to_string(),
            trigger_scheme: "packsync".to_string(),
            max_concurrent_assets: 8,
            preview_max_bytes: 1_000_000,
            cache_root: None,
            state_path: None,
        }
    }
}

impl PacksyncConfig {
    /// Cache root, falling back to `~/.local/share/packsync`.
    pub fn resolved_cache_root(&self) -> Result<PathBuf> {
        match &self.cache_root {
            Some(p) => Ok(p.clone()),
            None => Ok(xdg::BaseDirectories::with_prefix("packsync")?.get_data_home()),
        }
    }

    /// State file, falling back to `~/.local/state/packsync/state.json`.
    pub fn resolved_state_path(&self) -> Result<PathBuf> {
        match &self.state_path {
            Some(p) => Ok(p.clone()),
            None => crate::state::JsonStateStore::default_path(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("packsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PacksyncConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<PacksyncConfig> {
    if !path.exists() {
        let default_cfg = PacksyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: PacksyncConfig = toml::from_str(&data)?;
    Ok(cfg)
}
