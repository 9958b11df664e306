//! `packsync sync` – resolve a trigger and sync its content pack.

use anyhow::{Context, Result};
use packsync_core::registry;
use packsync_core::sync::{SyncEvent, Syncer};
use packsync_core::trigger::BootstrapTrigger;

use crate::cli::LocalEnv;

pub async fn run_sync(env: &LocalEnv, payload: &str) -> Result<()> {
    // A bad trigger is reported to the user, not treated as a failure.
    let trigger = match BootstrapTrigger::parse(payload, &env.cfg.trigger_scheme) {
        Ok(t) => t,
        Err(e) => {
            tracing::info!(payload, "trigger rejected: {}", e);
            println!("{e}");
            return Ok(());
        }
    };
    println!("Syncing {} from container {}...", trigger.record, trigger.container);

    let registry = registry::open(&env.cfg.registry_root, &trigger.container)
        .with_context(|| format!("open registry container {:?}", trigger.container))?;

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<SyncEvent>(64);
    let progress_handle = tokio::spawn(async move {
        while let Some(event) = progress_rx.recv().await {
            match event {
                SyncEvent::Phase(phase) => println!("  {phase}"),
                SyncEvent::AssetCached {
                    filename,
                    done,
                    total,
                } => println!("  [{done}/{total}] {filename}"),
            }
        }
    });

    let syncer = Syncer::new(registry, env.cache.clone(), env.state.clone())
        .with_max_concurrent(env.cfg.max_concurrent_assets)
        .with_progress(progress_tx);
    let result = syncer.sync(&trigger.record).await;
    let version = syncer.current_version();
    drop(syncer);
    let _ = progress_handle.await;

    let updated = result.with_context(|| format!("sync {}", trigger.record))?;
    let version = version?;
    if updated {
        println!("Updated to version {version}.");
    } else {
        println!("Up to date (version {version}); links refreshed.");
    }
    Ok(())
}
