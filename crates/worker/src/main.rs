//! netfirst cache-warming entry point.
//!
//! Loads configuration, opens the versioned cache store, and runs the
//! install and activate phases against the live network. Fetch, push, and
//! click events come from embedding the worker; this binary only prepares
//! the store.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

use netfirst_client::{HttpNetwork, NetConfig};
use netfirst_core::{AppConfig, CacheDb, Error};
use netfirst_worker::capabilities::HostControl;
use netfirst_worker::lifecycle::LifecycleController;

/// Stand-in for a browsing host: the hand-off signals are logged, there
/// are no pages to hand over.
struct LocalHost;

#[async_trait]
impl HostControl for LocalHost {
    async fn skip_waiting(&self) -> Result<(), Error> {
        tracing::debug!("skip_waiting signaled");
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), Error> {
        tracing::debug!("claim_clients signaled");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Arc::new(AppConfig::load()?);
    tracing::info!(
        store = %config.cache_version,
        db = %config.db_path.display(),
        "starting netfirst"
    );

    let store = Arc::new(CacheDb::open(&config.db_path).await?);
    let net = Arc::new(HttpNetwork::new(NetConfig {
        user_agent: config.user_agent.clone(),
        timeout: config.timeout(),
    })?);

    let controller = LifecycleController::new(Arc::clone(&config), store, net);

    let install = controller.on_install(&LocalHost).await?;
    tracing::info!(
        cached = install.cached.len(),
        skipped = install.skipped_cross_origin.len(),
        "install complete"
    );

    let activate = controller.on_activate(&LocalHost).await?;
    tracing::info!(
        removed = activate.removed.len(),
        failed = activate.failed.len(),
        "activate complete"
    );

    Ok(())
}
