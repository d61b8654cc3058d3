//! Catalog service lifecycle: initial indexing and periodic refresh.
//!
//! [`CatalogService::start`] runs one full sync-build-publish cycle before
//! returning, so a started service always serves a snapshot. With a
//! positive index period configured it also spawns a background refresh
//! task that repeats the cycle; a cycle that fails at the top-level catalog
//! sync is abandoned and the previously published snapshot stays
//! authoritative ("stale but available" always beats "unavailable").
//!
//! Blocking git and filesystem work runs under `spawn_blocking` so the
//! async runtime's workers stay free for readers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use git_fetcher::RepoFetcher;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::booster::{Booster, Mission, Runtime};
use crate::configuration::CatalogConfig;
use crate::errors::Error;
use crate::index::{CatalogSnapshot, IndexBuilder};
use crate::store::CatalogStore;

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

/// Owns the catalog store and drives index rebuilds.
///
/// The service is an explicitly constructed value with an explicit
/// lifecycle: the host application builds a [`CatalogConfig`], calls
/// [`CatalogService::start`], hands the store to whatever serves queries,
/// and calls [`CatalogService::stop`] on shutdown.
pub struct CatalogService {
    store: Arc<CatalogStore>,
    shutdown: watch::Sender<bool>,
    worker: Option<JoinHandle<()>>,
}

impl CatalogService {
    /// Start the service: synchronize the catalog repository, build and
    /// publish the first snapshot, and begin periodic refreshes when
    /// configured.
    ///
    /// ## Errors
    ///
    /// Fails when the initial catalog synchronization or walk fails; no
    /// service is constructed in that case and nothing is left running.
    pub async fn start(
        config: CatalogConfig,
        fetcher: Arc<dyn RepoFetcher>,
    ) -> Result<Self, Error> {
        let initial = rebuild(config.clone(), Arc::clone(&fetcher)).await?;
        let store = Arc::new(CatalogStore::new(initial));

        let (shutdown, shutdown_rx) = watch::channel(false);
        let worker = config.index_period().map(|period| {
            info!("Re-indexing catalog every {:?}", period);
            tokio::spawn(refresh_loop(
                config,
                fetcher,
                Arc::clone(&store),
                period,
                shutdown_rx,
            ))
        });

        Ok(Self {
            store,
            shutdown,
            worker,
        })
    }

    /// Handle to the underlying store for readers that outlive a borrow of
    /// the service.
    pub fn store(&self) -> Arc<CatalogStore> {
        Arc::clone(&self.store)
    }

    /// All mission ids in the current snapshot.
    pub fn missions(&self) -> Vec<Mission> {
        self.store.missions()
    }

    /// Runtime ids available for `mission` in the current snapshot.
    pub fn runtimes(&self, mission: &Mission) -> Vec<Runtime> {
        self.store.runtimes(mission)
    }

    /// Look up the booster for a `(mission, runtime)` pair.
    pub fn find_booster(
        &self,
        mission: &Mission,
        runtime: &Runtime,
    ) -> Result<Option<Booster>, Error> {
        self.store.find_booster(mission, runtime)
    }

    /// Copy `booster`'s content into `destination` with the standard
    /// exclusions.
    pub fn copy_to(&self, booster: &Booster, destination: &Path) -> Result<PathBuf, Error> {
        self.store.copy_to(booster, destination)
    }

    /// Stop the background refresh task, letting an in-flight cycle wind
    /// down. The published snapshot stays available through any store
    /// handle obtained earlier; publication is all-or-nothing, so stopping
    /// mid-cycle cannot corrupt it.
    pub async fn stop(mut self) {
        debug!("Stopping catalog service");
        let _ = self.shutdown.send(true);
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                warn!("Catalog refresh task ended abnormally: {}", e);
            }
        }
    }
}

/// One full sync-build cycle, run off the async runtime's worker threads.
async fn rebuild(
    config: CatalogConfig,
    fetcher: Arc<dyn RepoFetcher>,
) -> Result<CatalogSnapshot, Error> {
    tokio::task::spawn_blocking(move || {
        fetcher.sync(
            config.repository(),
            config.reference(),
            config.catalog_root(),
        )?;
        IndexBuilder::new(fetcher.as_ref())
            .refresh_modules(config.refresh_modules())
            .build(config.catalog_root())
    })
    .await
    .map_err(|e| Error::Internal {
        reason: format!("index task failed: {e}"),
    })?
}

async fn refresh_loop(
    config: CatalogConfig,
    fetcher: Arc<dyn RepoFetcher>,
    store: Arc<CatalogStore>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the initial build has already
    // been published by `start`.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match rebuild(config.clone(), Arc::clone(&fetcher)).await {
                    Ok(snapshot) => store.publish(snapshot),
                    Err(e) => warn!("Catalog refresh failed, keeping previous snapshot: {}", e),
                }
            }
            _ = shutdown.changed() => {
                debug!("Catalog refresh loop stopping");
                break;
            }
        }
    }
}
