//! Concurrent download-and-verify of all manifest assets.
//!
//! One task per asset on a `JoinSet`, at most `max_concurrent` holding a
//! permit at once. The first failure aborts the remaining tasks and is
//! returned. Tasks that have not yet acquired a permit never start; a blocking
//! fetch/write already running finishes on the blocking pool. Files written
//! before the failure stay in the cache.

use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::cache::AssetCache;
use crate::checksum;
use crate::manifest::AssetDescriptor;
use crate::pack::ContentPack;
use crate::registry::{Registry, RegistryError};

use super::error::SyncError;
use super::progress::SyncEvent;

/// Fetch, verify and cache every asset. Returns the number cached.
pub(super) async fn download_assets(
    registry: Arc<dyn Registry>,
    cache: AssetCache,
    pack: Arc<ContentPack>,
    assets: Vec<AssetDescriptor>,
    max_concurrent: usize,
    progress: Option<mpsc::Sender<SyncEvent>>,
) -> Result<usize, SyncError> {
    let total = assets.len();
    let permits = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut join_set = JoinSet::new();

    for asset in assets {
        let registry = Arc::clone(&registry);
        let cache = cache.clone();
        let pack = Arc::clone(&pack);
        let permits = Arc::clone(&permits);
        join_set.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| SyncError::Task(format!("asset permit: {e}")))?;
            let filename = asset.filename.clone();
            tokio::task::spawn_blocking(move || fetch_verify_write(&*registry, &cache, &pack, &asset))
                .await
                .map_err(|e| SyncError::Task(format!("asset task join: {e}")))??;
            Ok::<_, SyncError>(filename)
        });
    }

    let mut done = 0usize;
    while let Some(res) = join_set.join_next().await {
        let outcome = res
            .map_err(|e| SyncError::Task(format!("asset task join: {e}")))
            .and_then(|r| r);
        match outcome {
            Ok(filename) => {
                done += 1;
                if let Some(tx) = &progress {
                    let _ = tx.try_send(SyncEvent::AssetCached {
                        filename,
                        done,
                        total,
                    });
                }
            }
            Err(e) => {
                tracing::warn!(done, total, "asset download failed, aborting remaining: {}", e);
                join_set.abort_all();
                return Err(e);
            }
        }
    }
    Ok(done)
}

/// One asset: locate its blob, fetch, verify, then write. Never writes unverified bytes.
fn fetch_verify_write(
    registry: &dyn Registry,
    cache: &AssetCache,
    pack: &ContentPack,
    asset: &AssetDescriptor,
) -> Result<(), SyncError> {
    let not_found = || SyncError::AssetNotFound {
        key: asset.key.clone(),
    };
    let blob = pack.asset_blob(&asset.key).map_err(|_| not_found())?;
    let bytes = match registry.fetch_blob(blob) {
        Ok(b) => b,
        Err(RegistryError::BlobNotFound(_)) => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };
    checksum::verify(&bytes, &asset.sha256).map_err(|m| SyncError::ChecksumMismatch {
        filename: asset.filename.clone(),
        expected: m.expected,
        actual: m.actual,
    })?;
    cache.write(&asset.filename, &bytes)?;
    tracing::debug!(key = %asset.key, file = %asset.filename, bytes = bytes.len(), "asset verified");
    Ok(())
}
