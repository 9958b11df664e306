//! Progress reporting for a sync attempt (phase changes and cached assets).
//!
//! Events are sent with `try_send`: a slow consumer loses events, it never
//! stalls the sync.

use std::fmt;

/// Steps of one sync attempt, in the order they are reported. `Failed` can
/// follow any step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    ResolvingBootstrap,
    FetchingPack,
    /// Version gate closed: links were refreshed, assets left alone.
    LinksOnlyUpdate,
    Downloading,
    Committed,
    Failed,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncPhase::ResolvingBootstrap => "resolving bootstrap",
            SyncPhase::FetchingPack => "fetching pack",
            SyncPhase::LinksOnlyUpdate => "links-only update",
            SyncPhase::Downloading => "downloading",
            SyncPhase::Committed => "committed",
            SyncPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Phase(SyncPhase),
    /// One asset was verified and written. `done` counts completions so far.
    AssetCached {
        filename: String,
        done: usize,
        total: usize,
    },
}

impl SyncEvent {
    /// Fraction of assets cached in [0.0, 1.0]; `None` for phase events.
    pub fn fraction(&self) -> Option<f64> {
        match self {
            SyncEvent::AssetCached { total: 0, .. } => Some(1.0),
            SyncEvent::AssetCached { done, total, .. } => {
                Some((*done as f64 / *total as f64).min(1.0))
            }
            SyncEvent::Phase(_) => None,
        }
    }
}
