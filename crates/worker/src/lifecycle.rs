//! Install/activate lifecycle for the versioned cache.
//!
//! Install populates a fresh store from the static asset manifest; activate
//! garbage-collects every stale version and claims open pages. Structural
//! store changes happen only here.

use std::sync::{Arc, Mutex};

use url::Url;

use crate::capabilities::HostControl;
use netfirst_client::Network;
use netfirst_core::{AppConfig, CacheStorage, Error, InterceptedRequest};

/// Phases a worker version moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    /// Installed, eligible for activation.
    Waiting,
    Activating,
    Active,
    /// A newer version finished activating; this one no longer runs.
    Superseded,
}

impl WorkerState {
    /// Only an active worker intercepts fetches.
    pub fn can_intercept(&self) -> bool {
        matches!(self, WorkerState::Active)
    }
}

/// What install accomplished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Manifest entries fetched and written into the new store.
    pub cached: Vec<String>,
    /// Manifest entries skipped because they point at another origin.
    /// Those are cached at runtime instead, if at all.
    pub skipped_cross_origin: Vec<String>,
}

/// What activation accomplished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivateReport {
    /// Stale store names that were deleted.
    pub removed: Vec<String>,
    /// Stale store names whose deletion failed (logged, not fatal).
    pub failed: Vec<String>,
}

/// Drives the install and activate phases against the cache store.
pub struct LifecycleController<S, N> {
    config: Arc<AppConfig>,
    store: Arc<S>,
    net: Arc<N>,
    state: Mutex<WorkerState>,
}

impl<S: CacheStorage, N: Network> LifecycleController<S, N> {
    pub fn new(config: Arc<AppConfig>, store: Arc<S>, net: Arc<N>) -> Self {
        Self { config, store, net, state: Mutex::new(WorkerState::Installing) }
    }

    pub fn state(&self) -> WorkerState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: WorkerState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// A newer version completed activation; this instance stops running.
    pub fn mark_superseded(&self) {
        self.set_state(WorkerState::Superseded);
    }

    /// Populate a fresh store under the current cache version.
    ///
    /// All manifest assets are fetched before anything is written, so a
    /// single failed fetch (or non-success status) aborts the install with
    /// nothing persisted. On success the host is signaled to skip the
    /// wait-for-pages-to-close hand-off.
    pub async fn on_install(&self, host: &dyn HostControl) -> Result<InstallReport, Error> {
        self.set_state(WorkerState::Installing);
        let base = self.config.base()?;

        let mut skipped = Vec::new();
        let mut pending = Vec::new();
        for asset in &self.config.precache_manifest {
            if is_cross_origin(asset, &base) {
                tracing::debug!(asset, "skipping cross-origin manifest entry");
                skipped.push(asset.clone());
                continue;
            }
            pending.push((asset.clone(), self.config.resolve(asset)?));
        }

        let mut snapshots = Vec::with_capacity(pending.len());
        for (asset, url) in pending {
            let request = InterceptedRequest::get(url);
            let snapshot = self
                .net
                .issue(&request)
                .await
                .map_err(|e| Error::InstallFetch { asset: asset.clone(), reason: e.to_string() })?;
            if !snapshot.is_success() {
                return Err(Error::InstallFetch { asset, reason: format!("status {}", snapshot.status) });
            }
            snapshots.push((asset, snapshot));
        }

        self.store.open_store(&self.config.cache_version).await?;
        let mut cached = Vec::with_capacity(snapshots.len());
        for (asset, snapshot) in snapshots {
            self.store.insert(&self.config.cache_version, &snapshot).await?;
            cached.push(asset);
        }

        tracing::info!(
            store = %self.config.cache_version,
            assets = cached.len(),
            "precached static assets"
        );

        host.skip_waiting().await?;
        self.set_state(WorkerState::Waiting);

        Ok(InstallReport { cached, skipped_cross_origin: skipped })
    }

    /// Delete every stale cache version, then take control of open pages.
    ///
    /// Deletions are best-effort: one failure is logged and does not stop
    /// the others. Idempotent when the store only holds the current
    /// version.
    pub async fn on_activate(&self, host: &dyn HostControl) -> Result<ActivateReport, Error> {
        self.set_state(WorkerState::Activating);

        let mut report = ActivateReport::default();
        for name in self.store.store_names().await? {
            if name == self.config.cache_version {
                continue;
            }
            match self.store.delete_store(&name).await {
                Ok(true) => {
                    tracing::debug!(store = %name, "deleted stale cache version");
                    report.removed.push(name);
                }
                Ok(false) => {
                    // Gone between enumeration and deletion; nothing to record.
                    tracing::debug!(store = %name, "stale cache version already gone");
                }
                Err(e) => {
                    let err = Error::StaleVersionDelete { name: name.clone(), reason: e.to_string() };
                    tracing::warn!(error = %err, "stale version deletion failed");
                    report.failed.push(name);
                }
            }
        }

        host.claim_clients().await?;
        self.set_state(WorkerState::Active);

        Ok(report)
    }
}

/// Whether a manifest entry is an absolute URL on another origin.
/// Relative entries resolve against the base and are never cross-origin.
fn is_cross_origin(asset: &str, base: &Url) -> bool {
    match Url::parse(asset) {
        Ok(url) => url.origin() != base.origin(),
        Err(_) => false,
    }
}
