//! Content pack synchronization.
//!
//! One `sync` call: resolve the bootstrap pointer, fetch the pack, refresh
//! the stored custom links, and, when the bootstrap version is newer than
//! the committed one, download and verify every manifest asset concurrently
//! before committing the new version. Steps run in order; only the asset
//! fan-out is concurrent.
//!
//! A failed sync leaves the committed version untouched. Assets written by a
//! fan-out that later failed are not removed; the stale version forces a full
//! re-download on the next sync.

mod error;
mod fanout;
mod progress;

pub use error::{SyncError, SyncErrorKind};
pub use progress::{SyncEvent, SyncPhase};

use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

use crate::cache::AssetCache;
use crate::manifest::PackManifest;
use crate::pack::{BootstrapPointer, ContentPack};
use crate::registry::{Record, RecordId, Registry};
use crate::state::StateStore;

/// Default bound on concurrently processed assets.
pub const DEFAULT_MAX_CONCURRENT_ASSETS: usize = 8;

/// Sync engine bound to one registry container, cache namespace and state store.
pub struct Syncer {
    registry: Arc<dyn Registry>,
    cache: AssetCache,
    state: Arc<dyn StateStore>,
    max_concurrent: usize,
    progress: Option<mpsc::Sender<SyncEvent>>,
}

impl Syncer {
    pub fn new(registry: Arc<dyn Registry>, cache: AssetCache, state: Arc<dyn StateStore>) -> Self {
        Self {
            registry,
            cache,
            state,
            max_concurrent: DEFAULT_MAX_CONCURRENT_ASSETS,
            progress: None,
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Send phase changes and per-asset completions to `tx`.
    pub fn with_progress(mut self, tx: mpsc::Sender<SyncEvent>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// Last committed pack version (0 if none).
    pub fn current_version(&self) -> Result<i64, SyncError> {
        Ok(self.state.load()?.current_version)
    }

    /// Links stored by the last pack fetch.
    pub fn stored_links(&self) -> Result<Vec<Url>, SyncError> {
        Ok(self.state.load()?.links())
    }

    /// Wipe cached assets and stored links, and reset the committed version so
    /// the next sync downloads everything again.
    pub fn clear(&self) -> Result<(), SyncError> {
        clear_local(&self.cache, &*self.state)
    }

    /// Run one sync attempt against the bootstrap record `bootstrap_id`.
    /// Returns `true` when a new asset version was downloaded and committed.
    pub async fn sync(&self, bootstrap_id: &RecordId) -> Result<bool, SyncError> {
        let result = self.run(bootstrap_id).await;
        if let Err(e) = &result {
            self.enter(SyncPhase::Failed);
            tracing::warn!(bootstrap = %bootstrap_id, kind = ?e.kind(), "sync failed: {}", e);
        }
        result
    }

    async fn run(&self, bootstrap_id: &RecordId) -> Result<bool, SyncError> {
        self.enter(SyncPhase::ResolvingBootstrap);
        let bootstrap_record = self.fetch_record(bootstrap_id.clone()).await?;
        let bootstrap =
            BootstrapPointer::from_record(&bootstrap_record).map_err(SyncError::InvalidBootstrap)?;
        tracing::debug!(
            pack = %bootstrap.latest_pack,
            version = bootstrap.version,
            "bootstrap resolved"
        );

        // The pack is always fetched: links track the newest pack regardless of asset version.
        self.enter(SyncPhase::FetchingPack);
        let pack_record = self.fetch_record(bootstrap.latest_pack.clone()).await?;
        let pack = ContentPack::new(bootstrap.latest_pack.clone(), pack_record);

        let links = pack.link_source().resolve();
        self.with_state(move |state| state.set_links(&links)).await?;

        let current = self.with_state(|state| state.load()).await?.current_version;
        if bootstrap.version <= current {
            self.enter(SyncPhase::LinksOnlyUpdate);
            tracing::info!(
                remote = bootstrap.version,
                current,
                "assets up to date, links refreshed"
            );
            return Ok(false);
        }

        let manifest = self.decode_manifest(&pack, bootstrap.version).await?;

        self.enter(SyncPhase::Downloading);
        let cached = fanout::download_assets(
            Arc::clone(&self.registry),
            self.cache.clone(),
            Arc::new(pack),
            manifest.assets,
            self.max_concurrent,
            self.progress.clone(),
        )
        .await?;

        let version = manifest.version;
        self.with_state(move |state| state.set_version(version)).await?;
        self.enter(SyncPhase::Committed);
        tracing::info!(version, assets = cached, previous = current, "pack committed");
        Ok(true)
    }

    /// Fetch the manifest blob, decode it, and cross-check its version with the
    /// pack's and the bootstrap's. Since the bootstrap version already passed the
    /// gate, a matching manifest can never move the committed version backwards.
    async fn decode_manifest(
        &self,
        pack: &ContentPack,
        announced: i64,
    ) -> Result<PackManifest, SyncError> {
        let blob = pack
            .manifest_blob()
            .map_err(|e| SyncError::MalformedPack(e.to_string()))?
            .clone();
        let declared = pack
            .version()
            .map_err(|e| SyncError::MalformedPack(e.to_string()))?;

        let registry = Arc::clone(&self.registry);
        let bytes = blocking(move || Ok(registry.fetch_blob(&blob)?)).await?;
        let manifest = PackManifest::decode(&bytes)
            .map_err(|e| SyncError::MalformedPack(format!("manifest: {e}")))?;

        if manifest.version != declared {
            return Err(SyncError::MalformedPack(format!(
                "pack {} declares version {} but its manifest declares {}",
                pack.id(),
                declared,
                manifest.version
            )));
        }
        if manifest.version != announced {
            return Err(SyncError::MalformedPack(format!(
                "bootstrap announces version {} but pack {} is version {}",
                announced,
                pack.id(),
                manifest.version
            )));
        }
        tracing::debug!(
            version = manifest.version,
            assets = manifest.assets.len(),
            "manifest decoded"
        );
        Ok(manifest)
    }

    async fn fetch_record(&self, id: RecordId) -> Result<Record, SyncError> {
        let registry = Arc::clone(&self.registry);
        blocking(move || Ok(registry.fetch_record(&id)?)).await
    }

    async fn with_state<T, F>(&self, f: F) -> Result<T, SyncError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn StateStore) -> Result<T, crate::state::StateError> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        blocking(move || Ok(f(&*state)?)).await
    }

    fn enter(&self, phase: SyncPhase) {
        tracing::debug!(%phase, "sync phase");
        if let Some(tx) = &self.progress {
            let _ = tx.try_send(SyncEvent::Phase(phase));
        }
    }
}

/// [`Syncer::clear`] without a registry, for callers that only hold the local side.
pub fn clear_local(cache: &AssetCache, state: &dyn StateStore) -> Result<(), SyncError> {
    cache.remove_all()?;
    state.set_links(&[])?;
    state.set_version(0)?;
    tracing::info!(dir = %cache.dir().display(), "cache and stored links cleared");
    Ok(())
}

/// Run blocking registry/state I/O on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, SyncError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SyncError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SyncError::Task(format!("blocking task join: {e}")))?
}
